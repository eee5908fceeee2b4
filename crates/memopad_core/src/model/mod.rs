//! Domain model for memo records.
//!
//! # Responsibility
//! - Define the canonical memo record shared by page and API surfaces.
//! - Keep field validation rules in one place for every write path.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId` and a unique `slug`.
//! - Validation reports all failing fields, not only the first one.

pub mod memo;
