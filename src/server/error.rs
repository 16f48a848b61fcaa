use crate::{CacheError, ScrapeError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors surfaced to HTTP clients as a status code with a plain-text body
#[derive(Debug)]
pub enum ApiError {
    Scrape(ScrapeError),
    Cache(CacheError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Scrape(ScrapeError::MissingUrl | ScrapeError::InvalidUrl { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Cache(CacheError::Empty) => StatusCode::NOT_FOUND,
            Self::Cache(CacheError::Corrupt { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        Self::Scrape(err)
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Scrape(e) => e.to_string(),
            Self::Cache(CacheError::Empty) => "No image data available".to_string(),
            Self::Cache(CacheError::Corrupt { .. }) => "Error decompressing image data".to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", status, body);
        } else {
            tracing::debug!("{}: {}", status, body);
        }

        (status, body).into_response()
    }
}
