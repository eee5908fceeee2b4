//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `memos` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `MemoInput::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - UNIQUE violations on `memos.slug` surface as `RepoError::SlugTaken`.

use crate::db::DbError;
use crate::model::memo::{Memo, MemoId, MemoInput, MemoValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    title,
    slug,
    text,
    created_at,
    updated_at
FROM memos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemoValidationError),
    Db(DbError),
    NotFound(String),
    SlugTaken(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(slug) => write!(f, "memo not found: {slug}"),
            Self::SlugTaken(slug) => write!(f, "slug already in use: {slug}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::SlugTaken(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<MemoValidationError> for RepoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for memo CRUD operations.
///
/// Keys every lookup and mutation by `slug`, the external identifier.
pub trait MemoRepository {
    /// Persists a new memo; timestamps are assigned by the store.
    fn insert(&self, id: MemoId, input: &MemoInput) -> RepoResult<()>;
    /// Returns the memo with the given slug, if any.
    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Memo>>;
    /// Returns all memos, newest creation first.
    fn list_ordered_by_created_desc(&self) -> RepoResult<Vec<Memo>>;
    /// Replaces title/slug/text of one memo and refreshes `updated_at`.
    fn update_by_slug(&self, slug: &str, input: &MemoInput) -> RepoResult<()>;
    /// Removes one memo permanently.
    fn delete_by_slug(&self, slug: &str) -> RepoResult<()>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn insert(&self, id: MemoId, input: &MemoInput) -> RepoResult<()> {
        input.validate()?;

        self.conn
            .execute(
                "INSERT INTO memos (id, title, slug, text, created_at, updated_at)
                 VALUES (
                    ?1, ?2, ?3, ?4,
                    (strftime('%s', 'now') * 1000),
                    (strftime('%s', 'now') * 1000)
                 );",
                params![
                    id.to_string(),
                    input.title.as_str(),
                    input.slug.as_str(),
                    input.text.as_str(),
                ],
            )
            .map_err(|err| map_slug_conflict(err, &input.slug))?;

        Ok(())
    }

    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE slug = ?1;"))?;

        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn list_ordered_by_created_desc(&self) -> RepoResult<Vec<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} ORDER BY created_at DESC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn update_by_slug(&self, slug: &str, input: &MemoInput) -> RepoResult<()> {
        input.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE memos
                 SET
                    title = ?1,
                    slug = ?2,
                    text = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE slug = ?4;",
                params![
                    input.title.as_str(),
                    input.slug.as_str(),
                    input.text.as_str(),
                    slug,
                ],
            )
            .map_err(|err| map_slug_conflict(err, &input.slug))?;

        if changed == 0 {
            return Err(RepoError::NotFound(slug.to_string()));
        }

        Ok(())
    }

    fn delete_by_slug(&self, slug: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE slug = ?1;", [slug])?;

        if changed == 0 {
            return Err(RepoError::NotFound(slug.to_string()));
        }

        Ok(())
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in memos.id")))?;

    Ok(Memo {
        id,
        title: row.get("title")?,
        slug: row.get("slug")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn map_slug_conflict(err: rusqlite::Error, slug: &str) -> RepoError {
    if is_slug_unique_violation(&err) {
        return RepoError::SlugTaken(slug.to_string());
    }

    RepoError::Db(DbError::Sqlite(err))
}

fn is_slug_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && message.contains("memos.slug")
        }
        _ => false,
    }
}
