//! Memo domain model and input validation.
//!
//! # Responsibility
//! - Define the canonical memo record returned by repositories.
//! - Validate user-supplied title/slug/text before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another memo.
//! - `slug` is the external lookup key and must stay URL-safe.
//! - `created_at` is set once at insert; `updated_at` moves on every write.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a memo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoId = Uuid;

/// Maximum accepted title length in characters.
pub const TITLE_MAX_CHARS: usize = 150;
/// Maximum accepted slug length in characters.
pub const SLUG_MAX_CHARS: usize = 50;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid slug regex"));

/// Canonical memo record as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Stable internal ID used for auditing and tie-breaking.
    pub id: MemoId,
    /// Short label shown in list and detail views.
    pub title: String,
    /// URL-safe unique external identifier.
    pub slug: String,
    /// Free-form body text.
    pub text: String,
    /// Unix epoch milliseconds, set once at insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

/// Field names used in validation error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoField {
    Title,
    Slug,
    Text,
}

impl MemoField {
    /// Stable lowercase name used in form and API error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Text => "text",
        }
    }
}

impl Display for MemoField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: MemoField,
    pub message: String,
}

/// Validation failure carrying every failing field at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoValidationError {
    pub errors: Vec<FieldError>,
}

impl MemoValidationError {
    /// Returns all messages recorded for one field.
    pub fn messages_for(&self, field: MemoField) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|err| err.field == field)
            .map(|err| err.message.as_str())
            .collect()
    }
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for MemoValidationError {}

/// User-supplied memo fields for create and update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub text: String,
}

impl MemoInput {
    /// Checks all fields and returns every violation found.
    ///
    /// # Contract
    /// - `title` must be non-blank and at most [`TITLE_MAX_CHARS`] chars.
    /// - `slug` must be non-blank, at most [`SLUG_MAX_CHARS`] chars, and
    ///   match the slug alphabet (letters, digits, hyphen, underscore).
    /// - `text` must be non-blank; the storage schema accepts the empty
    ///   string, but the business rule rejects it on every write path.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError {
                field: MemoField::Title,
                message: "title is required".to_string(),
            });
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push(FieldError {
                field: MemoField::Title,
                message: format!("title must be at most {TITLE_MAX_CHARS} characters"),
            });
        }

        if self.slug.trim().is_empty() {
            errors.push(FieldError {
                field: MemoField::Slug,
                message: "slug is required".to_string(),
            });
        } else if self.slug.chars().count() > SLUG_MAX_CHARS {
            errors.push(FieldError {
                field: MemoField::Slug,
                message: format!("slug must be at most {SLUG_MAX_CHARS} characters"),
            });
        } else if !SLUG_RE.is_match(&self.slug) {
            errors.push(FieldError {
                field: MemoField::Slug,
                message: "slug may only contain letters, digits, hyphens and underscores"
                    .to_string(),
            });
        }

        if self.text.trim().is_empty() {
            errors.push(FieldError {
                field: MemoField::Text,
                message: "text is required".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MemoValidationError { errors })
        }
    }
}
