//! JSON API handlers under `/api/memos/`.
//!
//! # Responsibility
//! - Expose list/retrieve/create/update/delete over the memo service.
//! - Shape responses: list items exclude body text, detail carries it.
//!
//! # Invariants
//! - Validation failures answer 400 with a `field -> messages` map.
//! - Unknown slugs answer 404 with `{"detail": "not found"}`.
//! - Storage faults answer 500 and log the cause; details never leak.

use crate::app::{db_conn, field_error_map, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use memopad_core::{Memo, MemoId, MemoInput, MemoService, MemoServiceError, SqliteMemoRepository};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// List projection: everything except the body text.
#[derive(Debug, Serialize)]
pub struct MemoListItem {
    pub id: MemoId,
    pub title: String,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Memo> for MemoListItem {
    fn from(memo: Memo) -> Self {
        Self {
            id: memo.id,
            title: memo.title,
            slug: memo.slug,
            created_at: memo.created_at,
            updated_at: memo.updated_at,
        }
    }
}

/// Detail projection: the full record.
#[derive(Debug, Serialize)]
pub struct MemoDetail {
    pub id: MemoId,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Memo> for MemoDetail {
    fn from(memo: Memo) -> Self {
        Self {
            id: memo.id,
            title: memo.title,
            slug: memo.slug,
            text: memo.text,
            created_at: memo.created_at,
            updated_at: memo.updated_at,
        }
    }
}

// GET /api/memos/
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.list() {
        Ok(memos) => {
            let items: Vec<MemoListItem> = memos.into_iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(err) => internal_error(&err),
    }
}

// GET /api/memos/:slug/
pub async fn retrieve(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.get(&slug) {
        Ok(memo) => Json(MemoDetail::from(memo)).into_response(),
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

// POST /api/memos/new/
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<MemoInput>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.create(&input) {
        Ok(memo) => (StatusCode::CREATED, Json(MemoDetail::from(memo))).into_response(),
        Err(err) => error_response(err),
    }
}

// PUT /api/memos/edit/:slug/
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(input): Json<MemoInput>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.update(&slug, &input) {
        Ok(memo) => Json(MemoDetail::from(memo)).into_response(),
        Err(err) => error_response(err),
    }
}

// DELETE /api/memos/delete/:slug/
pub async fn destroy(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.delete(&slug) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

fn error_response(err: MemoServiceError) -> Response {
    if let Some(errors) = field_error_map(&err) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();
    }

    match err {
        MemoServiceError::MemoNotFound(_) => not_found(),
        other => internal_error(&other),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))).into_response()
}

fn internal_error(err: &dyn std::error::Error) -> Response {
    log::error!("event=api_request module=server status=error error={err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "internal server error" })),
    )
        .into_response()
}
