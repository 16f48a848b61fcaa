//! Scrape module for the on-demand scrape proxy
//!
//! This module contains:
//! - `ImageCache`: the single-slot, lock-guarded store for the last image
//! - `ImagePolicy`: the extension check deciding which images are JPEGs
//! - `ScrapeOrchestrator`: link counting and image caching for one target page

mod cache;
mod orchestrator;
mod policy;

pub use cache::{CachedImage, ImageCache};
pub use orchestrator::{PageInfo, ScrapeOrchestrator};
pub use policy::ImagePolicy;
