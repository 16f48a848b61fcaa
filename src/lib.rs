//! Gallery-Harvester: brute-force gallery downloader and on-demand scrape proxy
//!
//! This crate implements two independent subsystems:
//! - a harvester that guesses gallery identifiers and walks their page sequence
//!   until a fetch fails, saving every page to disk and an append-only log
//! - a scrape proxy that extracts links from a target page, caches the last
//!   matching JPEG in memory and serves it back through a retrieval endpoint

pub mod config;
pub mod crawler;
pub mod harvester;
pub mod scrape;
pub mod server;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Gallery-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Image cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reaching a remote host
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or timeout failure
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Status code to report for this failure
    ///
    /// Transport failures never produced a response, so this is always 0.
    pub fn status_code(&self) -> u16 {
        0
    }
}

/// Local file write and log append failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create download root {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to append to log {path}: {source}")]
    LogAppend {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Retrieval failures of the single-slot image cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("No image data available")]
    Empty,

    #[error("Corrupt image data: {source}")]
    Corrupt { source: std::io::Error },
}

/// Scrape request failures
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("missing URL argument")]
    MissingUrl,

    #[error("invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },
}

/// Result type alias for Gallery-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Fetcher, HttpFetcher};
pub use harvester::{GalleryIdentifier, Harvester, PageCursor};
pub use scrape::{ImageCache, PageInfo, ScrapeOrchestrator};
