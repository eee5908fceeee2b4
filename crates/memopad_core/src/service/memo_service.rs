//! Memo use-case service.
//!
//! # Responsibility
//! - Provide validated create/get/update/delete entry points keyed by slug.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Failed operations leave prior state untouched.
//! - `update` reports a missing slug before field validation, matching the
//!   lookup-then-validate order of the page flow.

use crate::model::memo::{Memo, MemoInput, MemoValidationError};
use crate::repo::memo_repo::{MemoRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// One or more input fields failed validation.
    Validation(MemoValidationError),
    /// Another memo already owns the requested slug.
    SlugTaken(String),
    /// Target memo does not exist.
    MemoNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SlugTaken(slug) => write!(f, "slug already in use: {slug}"),
            Self::MemoNotFound(slug) => write!(f, "memo not found: {slug}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent memo state: {details}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(slug) => Self::MemoNotFound(slug),
            RepoError::SlugTaken(slug) => Self::SlugTaken(slug),
            other => Self::Repo(other),
        }
    }
}

/// Memo service facade over repository implementations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one memo from validated input.
    ///
    /// # Contract
    /// - Nothing is persisted when validation fails.
    /// - A duplicate slug is rejected as [`MemoServiceError::SlugTaken`].
    /// - Returns the stored record with store-assigned timestamps.
    pub fn create(&self, input: &MemoInput) -> Result<Memo, MemoServiceError> {
        let id = Uuid::new_v4();
        self.repo.insert(id, input)?;
        self.repo
            .find_by_slug(&input.slug)?
            .ok_or(MemoServiceError::InconsistentState(
                "created memo not found in read-back",
            ))
    }

    /// Lists all memos, newest creation first.
    pub fn list(&self) -> Result<Vec<Memo>, MemoServiceError> {
        Ok(self.repo.list_ordered_by_created_desc()?)
    }

    /// Gets one memo by slug.
    pub fn get(&self, slug: &str) -> Result<Memo, MemoServiceError> {
        self.repo
            .find_by_slug(slug)?
            .ok_or_else(|| MemoServiceError::MemoNotFound(slug.to_string()))
    }

    /// Replaces title/slug/text of one memo.
    ///
    /// # Contract
    /// - Unknown `slug` fails with [`MemoServiceError::MemoNotFound`] before
    ///   any field validation runs.
    /// - Validation failure leaves the stored record unchanged.
    /// - `created_at` is never touched; `updated_at` is refreshed.
    pub fn update(&self, slug: &str, input: &MemoInput) -> Result<Memo, MemoServiceError> {
        if self.repo.find_by_slug(slug)?.is_none() {
            return Err(MemoServiceError::MemoNotFound(slug.to_string()));
        }

        self.repo.update_by_slug(slug, input)?;
        self.repo
            .find_by_slug(&input.slug)?
            .ok_or(MemoServiceError::InconsistentState(
                "updated memo not found in read-back",
            ))
    }

    /// Deletes one memo by slug.
    ///
    /// Deleting an already-absent slug fails with
    /// [`MemoServiceError::MemoNotFound`].
    pub fn delete(&self, slug: &str) -> Result<(), MemoServiceError> {
        self.repo.delete_by_slug(slug)?;
        Ok(())
    }
}
