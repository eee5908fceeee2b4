//! Core domain logic for memopad.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memo::{
    FieldError, Memo, MemoField, MemoId, MemoInput, MemoValidationError, SLUG_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use repo::memo_repo::{MemoRepository, RepoError, RepoResult, SqliteMemoRepository};
pub use search::keyword::filter_by_keyword;
pub use service::listing::{list_page, ListingError, MemoPage, PAGE_SIZE};
pub use service::memo_service::{MemoService, MemoServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
