//! Application state, router construction and shared handler plumbing.
//!
//! # Responsibility
//! - Own the process-wide `AppState` (shared SQLite connection).
//! - Build the full route table for pages and API.
//! - Translate service errors into the field-error shape both surfaces share.
//!
//! # Invariants
//! - The DB mutex is never held across an await point.
//! - Every request emits one `http_request` log event.

use crate::{api, pages};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use log::info;
use memopad_core::MemoServiceError;
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Shared per-process state behind every handler.
pub struct AppState {
    pub db: Mutex<Connection>,
}

impl AppState {
    /// Wraps a migrated/ready connection for handler access.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }
}

/// Builds the complete router over the given state.
///
/// Kept separate from `main` so tests can drive the router directly.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/new_memo", get(pages::new_form).post(pages::create))
        .route("/detail/:slug", get(pages::detail))
        .route("/edit/:slug", get(pages::edit_form).post(pages::update))
        .route("/delete/:slug", get(pages::delete_form).post(pages::destroy))
        .route("/healthz", get(health))
        .route("/api/memos/", get(api::list))
        .route("/api/memos/new/", post(api::create))
        .route("/api/memos/:slug/", get(api::retrieve))
        .route("/api/memos/edit/:slug/", put(api::update))
        .route("/api/memos/delete/:slug/", delete(api::destroy))
        .layer(middleware::from_fn(trace_requests))
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Response {
    Json(json!({
        "service": "memopad",
        "version": memopad_core::core_version(),
        "status": "ok",
    }))
    .into_response()
}

async fn trace_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(req).await;

    info!(
        "event=http_request module=server status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}

/// Locks the shared connection, mapping a poisoned mutex to a plain 500.
pub fn db_conn(state: &AppState) -> Result<MutexGuard<'_, Connection>, Response> {
    state.db.lock().map_err(|_| {
        log::error!("event=db_lock module=server status=error error=poisoned");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    })
}

/// Maps a service error to the `field -> messages` shape shared by the form
/// re-render path and the API 400 payload.
///
/// Returns `None` for errors that are not field-shaped (not-found, storage).
pub fn field_error_map(err: &MemoServiceError) -> Option<BTreeMap<&'static str, Vec<String>>> {
    match err {
        MemoServiceError::Validation(validation) => {
            let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
            for field_error in &validation.errors {
                map.entry(field_error.field.as_str())
                    .or_default()
                    .push(field_error.message.clone());
            }
            Some(map)
        }
        MemoServiceError::SlugTaken(_) => Some(BTreeMap::from([(
            "slug",
            vec!["slug is already in use".to_string()],
        )])),
        _ => None,
    }
}
