//! Coursebook REST API server binary.
//!
//! ## Environment Variables
//! - `COURSEBOOK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
//! - `COURSEBOOK_DB`: SQLite database path (default: "coursebook.db")

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursebook_api::{router, AppState};
use coursebook_core::{CoreConfig, DocumentStore};

/// Main entry point for the coursebook REST API server.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the document store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coursebook_api=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("COURSEBOOK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let db_path = std::env::var("COURSEBOOK_DB").unwrap_or_else(|_| "coursebook.db".into());

    let cfg = CoreConfig::new(PathBuf::from(db_path))?;
    let store = Arc::new(DocumentStore::open(cfg.store_path())?);

    tracing::info!("-- Starting coursebook REST API on {}", addr);

    let app = router(AppState { store });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
