//! Paginated, searchable memo listing.
//!
//! # Responsibility
//! - Compose the ordered repository query, the keyword filter and fixed-size
//!   pagination into the index-page result.
//!
//! # Invariants
//! - Memos are ordered newest creation first before filtering.
//! - Pages are 1-indexed windows of [`PAGE_SIZE`] items.
//! - A page beyond the last one, page zero, or a non-numeric page token is a
//!   not-found condition; page 1 over an empty result is a valid empty page.

use crate::model::memo::Memo;
use crate::repo::memo_repo::{MemoRepository, RepoError};
use crate::search::keyword::filter_by_keyword;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed number of memos per listing page.
pub const PAGE_SIZE: usize = 10;

/// Listing-layer error for page resolution and repository access.
#[derive(Debug)]
pub enum ListingError {
    /// Requested page token does not resolve to an existing page.
    PageNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(token) => write!(f, "page not found: `{token}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PageNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ListingError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One resolved listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoPage {
    /// Items of this page, newest creation first.
    pub items: Vec<Memo>,
    /// 1-indexed page number.
    pub page_number: usize,
    /// Number of pages for the filtered set; at least 1.
    pub total_pages: usize,
    /// Number of memos matching the filter across all pages.
    pub total_items: usize,
}

impl MemoPage {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Resolves the memo page for the index view.
///
/// `keyword` narrows by case-insensitive title/text match; `page` is the raw
/// query-string token (absent means page 1).
pub fn list_page<R: MemoRepository>(
    repo: &R,
    keyword: Option<&str>,
    page: Option<&str>,
) -> Result<MemoPage, ListingError> {
    let requested = parse_page_token(page)?;

    let memos = repo.list_ordered_by_created_desc()?;
    let matched = filter_by_keyword(keyword, memos);

    let total_items = matched.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
    if requested > total_pages {
        return Err(ListingError::PageNotFound(
            page.unwrap_or_default().to_string(),
        ));
    }

    let items = matched
        .into_iter()
        .skip((requested - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Ok(MemoPage {
        items,
        page_number: requested,
        total_pages,
        total_items,
    })
}

fn parse_page_token(token: Option<&str>) -> Result<usize, ListingError> {
    let Some(raw) = token else {
        return Ok(1);
    };

    match raw.trim().parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number),
        _ => Err(ListingError::PageNotFound(raw.to_string())),
    }
}
