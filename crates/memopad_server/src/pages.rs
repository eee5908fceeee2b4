//! Server-rendered page handlers.
//!
//! # Responsibility
//! - Render the searchable index, detail, and create/edit/delete flows.
//! - Re-render forms with field errors on invalid input; redirect on success.
//!
//! # Invariants
//! - Every piece of user-entered text is HTML-escaped before rendering.
//! - Invalid page tokens and unknown slugs answer 404, never an empty page.

use crate::app::{db_conn, field_error_map, AppState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use memopad_core::{
    list_page, ListingError, MemoInput, MemoPage, MemoService, MemoServiceError,
    SqliteMemoRepository,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Query parameters accepted by the index page.
///
/// `page` stays a raw string so a non-numeric token can 404 instead of being
/// rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub keyword: Option<String>,
    pub page: Option<String>,
}

// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let repo = SqliteMemoRepository::new(&conn);

    match list_page(&repo, params.keyword.as_deref(), params.page.as_deref()) {
        Ok(page) => Html(render_index(&page, params.keyword.as_deref())).into_response(),
        Err(ListingError::PageNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

// GET /new_memo
pub async fn new_form() -> Response {
    let body = memo_form("/new_memo", "New memo", &MemoInput::default(), &FieldErrors::new());
    Html(layout("New memo", &body)).into_response()
}

// POST /new_memo
pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(input): Form<MemoInput>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.create(&input) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => match field_error_map(&err) {
            Some(errors) => {
                let body = memo_form("/new_memo", "New memo", &input, &errors);
                Html(layout("New memo", &body)).into_response()
            }
            None => internal_error(&err),
        },
    }
}

// GET /detail/:slug
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.get(&slug) {
        Ok(memo) => {
            let body = format!(
                r#"<article class="memo">
<h2>{title}</h2>
<p class="meta">created {created} &middot; updated {updated}</p>
<div class="text">{text}</div>
</article>
<nav class="actions">
<a href="/edit/{slug}">Edit</a>
<a href="/delete/{slug}">Delete</a>
<a href="/">Back to list</a>
</nav>"#,
                title = escape_html(&memo.title),
                created = format_timestamp(memo.created_at),
                updated = format_timestamp(memo.updated_at),
                text = escape_html(&memo.text),
                slug = escape_html(&memo.slug),
            );
            Html(layout(&memo.title, &body)).into_response()
        }
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

// GET /edit/:slug
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.get(&slug) {
        Ok(memo) => {
            let input = MemoInput {
                title: memo.title,
                slug: memo.slug,
                text: memo.text,
            };
            let action = format!("/edit/{}", escape_html(&slug));
            let body = memo_form(&action, "Edit memo", &input, &FieldErrors::new());
            Html(layout("Edit memo", &body)).into_response()
        }
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

// POST /edit/:slug
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(input): Form<MemoInput>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.update(&slug, &input) {
        Ok(updated) => Redirect::to(&format!("/detail/{}", updated.slug)).into_response(),
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => match field_error_map(&err) {
            Some(errors) => {
                let action = format!("/edit/{}", escape_html(&slug));
                let body = memo_form(&action, "Edit memo", &input, &errors);
                Html(layout("Edit memo", &body)).into_response()
            }
            None => internal_error(&err),
        },
    }
}

// GET /delete/:slug
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.get(&slug) {
        Ok(memo) => {
            let body = format!(
                r#"<h2>Delete memo</h2>
<p>Delete &ldquo;{title}&rdquo;? This cannot be undone.</p>
<form action="/delete/{slug}" method="post">
<button type="submit">Delete</button>
<a href="/detail/{slug}">Cancel</a>
</form>"#,
                title = escape_html(&memo.title),
                slug = escape_html(&memo.slug),
            );
            Html(layout("Delete memo", &body)).into_response()
        }
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

// POST /delete/:slug
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let conn = match db_conn(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    match service.delete(&slug) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(MemoServiceError::MemoNotFound(_)) => not_found(),
        Err(err) => internal_error(&err),
    }
}

fn render_index(page: &MemoPage, keyword: Option<&str>) -> String {
    let mut items = String::new();
    if page.items.is_empty() {
        items.push_str("<p class=\"empty\">No memos to display.</p>\n");
    } else {
        items.push_str("<ul class=\"memo-list\">\n");
        for memo in &page.items {
            items.push_str(&format!(
                "<li><a href=\"/detail/{slug}\">{title}</a> <span class=\"meta\">{created}</span></li>\n",
                slug = escape_html(&memo.slug),
                title = escape_html(&memo.title),
                created = format_timestamp(memo.created_at),
            ));
        }
        items.push_str("</ul>\n");
    }

    let mut pagination = String::new();
    if page.has_previous() || page.has_next() {
        pagination.push_str("<nav class=\"pagination\">");
        if page.has_previous() {
            pagination.push_str(&format!(
                "<a href=\"{}\">&laquo; newer</a> ",
                index_href(page.page_number - 1, keyword)
            ));
        }
        pagination.push_str(&format!(
            "<span>page {} of {}</span>",
            page.page_number, page.total_pages
        ));
        if page.has_next() {
            pagination.push_str(&format!(
                " <a href=\"{}\">older &raquo;</a>",
                index_href(page.page_number + 1, keyword)
            ));
        }
        pagination.push_str("</nav>\n");
    }

    let body = format!(
        r#"<form action="/" method="get" class="search">
<input type="text" name="keyword" value="{keyword_value}" placeholder="keyword">
<button type="submit">Search</button>
</form>
<p class="actions"><a href="/new_memo">New memo</a></p>
{items}{pagination}"#,
        keyword_value = escape_html(keyword.unwrap_or_default()),
    );

    layout("Memos", &body)
}

fn memo_form(action: &str, heading: &str, input: &MemoInput, errors: &FieldErrors) -> String {
    format!(
        r#"<h2>{heading}</h2>
<form action="{action}" method="post" class="memo-form">
<label>Title
<input type="text" name="title" value="{title}" placeholder="title">
</label>
{title_errors}
<label>Slug
<input type="text" name="slug" value="{slug}" placeholder="slug">
</label>
{slug_errors}
<label>Text
<textarea name="text" rows="8" placeholder="text">{text}</textarea>
</label>
{text_errors}
<button type="submit">Save</button>
</form>"#,
        heading = escape_html(heading),
        action = action,
        title = escape_html(&input.title),
        slug = escape_html(&input.slug),
        text = escape_html(&input.text),
        title_errors = field_error_list(errors, "title"),
        slug_errors = field_error_list(errors, "slug"),
        text_errors = field_error_list(errors, "text"),
    )
}

fn field_error_list(errors: &FieldErrors, field: &str) -> String {
    let Some(messages) = errors.get(field) else {
        return String::new();
    };

    let mut list = String::from("<ul class=\"errors\">");
    for message in messages {
        list.push_str(&format!("<li>{}</li>", escape_html(message)));
    }
    list.push_str("</ul>");
    list
}

fn index_href(page_number: usize, keyword: Option<&str>) -> String {
    match keyword {
        Some(keyword) if !keyword.trim().is_empty() => format!(
            "/?page={page_number}&keyword={}",
            urlencoding::encode(keyword)
        ),
        _ => format!("/?page={page_number}"),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} &middot; memopad</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #fafafa; color: #24292f; padding: 24px; max-width: 720px; margin: 0 auto; }}
  header h1 {{ margin-bottom: 16px; }}
  header a {{ color: inherit; text-decoration: none; }}
  .memo-list li {{ list-style: none; padding: 8px 0; border-bottom: 1px solid #d0d7de; }}
  .meta {{ color: #57606a; font-size: 0.85em; }}
  .empty {{ color: #57606a; padding: 16px 0; }}
  .search input {{ padding: 6px 8px; }}
  .memo-form label {{ display: block; margin-top: 12px; }}
  .memo-form input, .memo-form textarea {{ width: 100%; padding: 6px 8px; margin-top: 4px; }}
  .memo-form button {{ margin-top: 12px; }}
  .errors {{ color: #cf222e; margin: 4px 0 0 16px; }}
  .actions {{ margin: 16px 0; }}
  .actions a {{ margin-right: 8px; }}
  .pagination {{ margin-top: 16px; color: #57606a; }}
  .text {{ white-space: pre-wrap; margin-top: 12px; }}
</style>
</head>
<body>
<header><h1><a href="/">memopad</a></h1></header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

fn format_timestamp(epoch_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms)
        .map(|datetime| datetime.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn not_found() -> Response {
    let body = "<h2>Not found</h2>\n<p>The page you asked for does not exist.</p>";
    (StatusCode::NOT_FOUND, Html(layout("Not found", body))).into_response()
}

fn internal_error(err: &dyn std::error::Error) -> Response {
    log::error!("event=page_render module=server status=error error={err}");
    let body = "<h2>Something went wrong</h2>";
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(layout("Error", body)),
    )
        .into_response()
}
