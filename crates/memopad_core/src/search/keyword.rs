//! Case-insensitive keyword filtering over memo collections.
//!
//! # Responsibility
//! - Provide the pure filter used by the listing service.
//!
//! # Invariants
//! - A blank or absent keyword returns the input unchanged.
//! - Input order is preserved; ordering is owned by the upstream query.
//! - Absence of matches yields an empty result, never an error.

use crate::model::memo::Memo;

/// Retains memos whose `title` or `text` contains `keyword`,
/// case-insensitively.
///
/// `None` or a keyword that is blank after trimming is the identity.
pub fn filter_by_keyword(keyword: Option<&str>, memos: Vec<Memo>) -> Vec<Memo> {
    let Some(raw) = keyword else {
        return memos;
    };

    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return memos;
    }

    memos
        .into_iter()
        .filter(|memo| {
            memo.title.to_lowercase().contains(&needle)
                || memo.text.to_lowercase().contains(&needle)
        })
        .collect()
}
