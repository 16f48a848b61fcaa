//! HTTP surface of the scrape proxy
//!
//! - `GET /?url=<target>` scrapes the target and returns `PageInfo` as JSON
//! - `GET /image` serves the cached image as `image/jpeg`

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{image_handler, scrape_handler, ScrapeParams};

use crate::config::ScraperConfig;
use crate::crawler::Fetcher;
use crate::scrape::{ImageCache, ScrapeOrchestrator};
use axum::{extract::Extension, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub cache: Arc<ImageCache>,
}

impl AppState {
    /// Composition root: one cache shared by the orchestrator and the image route
    pub fn new(config: &ScraperConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let cache = Arc::new(ImageCache::new());
        let orchestrator = Arc::new(ScrapeOrchestrator::new(config, fetcher, cache.clone()));
        Self {
            orchestrator,
            cache,
        }
    }
}

/// Build the Axum application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(scrape_handler))
        .route("/image", get(image_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Serves the router on `listener` until `shutdown` resolves
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
