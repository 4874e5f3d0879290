//! Binary entrypoint for the memora HTTP server.
//!
//! Reads configuration from environment variables:
//! - `MEMORA_DB_PATH`: SQLite database file path (default: "memora.db")
//! - `MEMORA_PORT`: Server listen port (default: "8080")

use memora_server::router::build_router;
use memora_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("MEMORA_DB_PATH")
        .unwrap_or_else(|_| "memora.db".to_string());
    let port = std::env::var("MEMORA_PORT")
        .unwrap_or_else(|_| "8080".to_string());

    let state = AppState::new(&db_path)
        .expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("memora server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
