use crate::scrape::PageInfo;
use crate::server::{ApiError, AppState};
use crate::ScrapeError;
use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Query string of the scrape endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
}

/// `GET /?url=<target>`
///
/// Returns 400 with a plain-text body when `url` is missing or invalid.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<PageInfo>, ApiError> {
    let url = params.url.ok_or(ScrapeError::MissingUrl)?;
    let info = state.orchestrator.scrape_page(&url).await?;
    Ok(Json(info))
}

/// `GET /image`
///
/// Serves the cached image; 404 before anything was cached, 500 if the
/// stored data cannot be decompressed.
pub async fn image_handler(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let cache = state.cache.clone();
    let image = match tokio::task::spawn_blocking(move || cache.get()).await {
        Ok(result) => result?,
        Err(e) => {
            tracing::error!("Image retrieval task failed: {}", e);
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, "Error reading image data").into_response());
        }
    };

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image).into_response())
}
