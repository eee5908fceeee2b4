//! memopad HTTP server binary.
//!
//! Serves the HTML memo pages and the JSON API from one process.
//! Default: http://127.0.0.1:8370/

use memopad_core::db::open_db;
use memopad_server::app::{build_app, AppState};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let port: u16 = std::env::var("MEMOPAD_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8370);

    let db_path = std::env::var("MEMOPAD_DB_PATH").unwrap_or_else(|_| "./memopad.db".to_string());

    let log_level = std::env::var("MEMOPAD_LOG_LEVEL")
        .unwrap_or_else(|_| memopad_core::default_log_level().to_string());
    let log_dir = std::env::var("MEMOPAD_LOG_DIR").map(PathBuf::from).unwrap_or_else(|_| {
        std::env::current_dir()
            .expect("current directory should be readable")
            .join("logs")
    });
    let log_dir = log_dir
        .to_str()
        .expect("log directory should be valid UTF-8");
    if let Err(err) = memopad_core::init_logging(&log_level, log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let conn = open_db(&db_path).expect("failed to open database");
    let state = Arc::new(AppState::new(conn));
    let app = build_app(state);

    let addr = format!("127.0.0.1:{port}");
    log::info!("event=server_start module=server status=ok addr={addr} db_path={db_path}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    axum::serve(listener, app).await.expect("server error");
}
