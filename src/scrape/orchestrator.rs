//! Scrape orchestration
//!
//! Given a target page, this module:
//! 1. Fetches and parses the page
//! 2. Counts every anchor target, keyed by its proxy link
//! 3. Fetches each JPEG image and hands it to the image cache
//! 4. Returns a `PageInfo` pointing at the retrieval endpoint

use crate::config::ScraperConfig;
use crate::crawler::Fetcher;
use crate::scrape::{ImageCache, ImagePolicy};
use crate::ScrapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Per-request scrape result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Status of the target page, or 0 when no response was received
    #[serde(rename = "StatusCode")]
    pub status_code: u16,

    /// Proxy link (`<base>/?url=<absolute link>`) to occurrence count
    #[serde(rename = "Links")]
    pub links: BTreeMap<String, u32>,

    /// Retrieval endpoint for the cached image
    #[serde(rename = "Image")]
    pub image_ref: String,

    /// Source URL of the image this request left in the cache, if any
    #[serde(skip)]
    pub cached_from: Option<String>,
}

/// Scrapes target pages and feeds the shared image cache
pub struct ScrapeOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<ImageCache>,
    policy: ImagePolicy,
    link_prefix: String,
    image_endpoint: String,
    use_compression: bool,
}

impl ScrapeOrchestrator {
    pub fn new(config: &ScraperConfig, fetcher: Arc<dyn Fetcher>, cache: Arc<ImageCache>) -> Self {
        Self {
            fetcher,
            cache,
            policy: ImagePolicy::new(&config.image_extensions),
            link_prefix: config.link_prefix(),
            image_endpoint: config.image_endpoint(),
            use_compression: config.compress_images,
        }
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Scrapes `target_url`
    ///
    /// # Returns
    ///
    /// * `Ok(PageInfo)` - Always returned once the URL is valid, including when
    ///   the page could not be fetched (status 0) or returned an error status
    /// * `Err(ScrapeError::MissingUrl)` - `target_url` is empty
    /// * `Err(ScrapeError::InvalidUrl)` - `target_url` is not an absolute URL
    pub async fn scrape_page(&self, target_url: &str) -> Result<PageInfo, ScrapeError> {
        let target_url = target_url.trim();
        if target_url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        let target = Url::parse(target_url).map_err(|source| ScrapeError::InvalidUrl {
            url: target_url.to_string(),
            source,
        })?;

        tracing::info!("visiting {}", target);

        let mut info = PageInfo {
            status_code: 0,
            links: BTreeMap::new(),
            image_ref: self.image_endpoint.clone(),
            cached_from: None,
        };

        let page = match self.fetcher.fetch_page(&target).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("error: {}", e);
                info.status_code = e.status_code();
                return Ok(info);
            }
        };

        tracing::info!("response received {}", page.status_code);
        info.status_code = page.status_code;

        for link in &page.links {
            *info
                .links
                .entry(format!("{}{}", self.link_prefix, link))
                .or_insert(0) += 1;
        }

        // Every accepted image overwrites the slot, so the last one stored wins
        for image_url in self.policy.select(&page.images) {
            if self.store_image(image_url).await {
                info.cached_from = Some(image_url.clone());
            }
        }

        Ok(info)
    }

    /// Fetches one image and puts it in the cache; returns true if stored
    async fn store_image(&self, image_url: &str) -> bool {
        let url = match Url::parse(image_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("invalid image URL {}: {}", image_url, e);
                return false;
            }
        };

        let response = match self.fetcher.fetch(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("error: {}", e);
                return false;
            }
        };

        if !response.is_success() {
            tracing::warn!("HTTP {} for image {}", response.status_code, image_url);
            return false;
        }

        match self.cache.put(&response.body, self.use_compression) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("error caching image {}: {}", image_url, e);
                false
            }
        }
    }
}
