//! Harvester loop - the sequential fetch-until-failure walk
//!
//! For each drawn identifier the harvester requests page 1, 2, 3, ... strictly
//! in order and stops at the first failure. A failure is never retried: the
//! gallery is treated as exhausted and a new identifier is drawn.

use crate::config::HarvesterConfig;
use crate::crawler::{FetchResponse, Fetcher};
use crate::harvester::{
    DownloadLog, DownloadRecord, GalleryIdentifier, HarvestState, HarvestStats, PageCursor,
    PageOutcome, PageStore,
};
use crate::{FetchError, StorageResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of walking one gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOutcome {
    pub identifier: GalleryIdentifier,

    /// Pages written to disk and logged
    pub pages_saved: u32,

    /// Last page number requested
    pub last_page: u32,

    /// The walk was interrupted before the gallery was exhausted
    pub cancelled: bool,
}

/// Brute-force gallery downloader
pub struct Harvester {
    config: HarvesterConfig,
    fetcher: Arc<dyn Fetcher>,
    store: PageStore,
    log: DownloadLog,
    rng: StdRng,
    stats: HarvestStats,
}

impl Harvester {
    /// Creates a harvester, preparing the download root and opening the log
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(StorageError)` - The download root or the log could not be opened
    pub async fn new(config: HarvesterConfig, fetcher: Arc<dyn Fetcher>) -> StorageResult<Self> {
        let store = PageStore::create(&config.download_root).await?;
        let log = DownloadLog::open(config.log_path()).await?;

        tracing::info!(
            "Harvesting into {} (log: {})",
            store.root().display(),
            log.path().display()
        );

        Ok(Self {
            config,
            fetcher,
            store,
            log,
            rng: StdRng::from_os_rng(),
            stats: HarvestStats::new(),
        })
    }

    /// Replaces the identifier generator, e.g. with a seeded one
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn stats(&self) -> &HarvestStats {
        &self.stats
    }

    /// Draws the next identifier from the configured space
    pub fn draw_identifier(&mut self) -> GalleryIdentifier {
        GalleryIdentifier::random(&mut self.rng, self.config.identifier_space)
    }

    /// Runs for the lifetime of the process
    pub async fn run_forever(&mut self) -> HarvestStats {
        self.run_until_cancelled(&CancellationToken::new()).await
    }

    /// Runs the identifier loop until `cancel` fires
    ///
    /// Cancellation interrupts an in-flight fetch; a page whose fetch already
    /// completed is still written and logged before the loop exits.
    pub async fn run_until_cancelled(&mut self, cancel: &CancellationToken) -> HarvestStats {
        tracing::info!(
            "Starting harvest over {} identifiers",
            self.config.identifier_space
        );

        while !cancel.is_cancelled() {
            let identifier = self.draw_identifier();
            let outcome = self.harvest_gallery(identifier, cancel).await;

            if outcome.cancelled {
                break;
            }

            if self.stats.galleries_tried % self.config.progress_interval.max(1) == 0 {
                self.stats.log_progress();
            }

            let delay = self.config.identifier_delay();
            if !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        tracing::info!("Harvest stopped");
        self.stats.log_progress();
        self.stats.clone()
    }

    /// Walks one gallery from page 1 until a fetch fails
    pub async fn harvest_gallery(
        &mut self,
        identifier: GalleryIdentifier,
        cancel: &CancellationToken,
    ) -> GalleryOutcome {
        tracing::debug!("Trying gallery {}", identifier);
        self.stats.galleries_tried += 1;

        let mut state = HarvestState::start(identifier.clone());
        let mut pages_saved = 0;
        let mut last_page = 0;

        while let HarvestState::Fetching(cursor) = &state {
            last_page = cursor.page_number;

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.fetch_page(cursor) => Some(result),
            };

            let Some(result) = fetched else {
                tracing::debug!("Cancelled while fetching {} page {}", identifier, last_page);
                return self.finish_gallery(identifier, pages_saved, last_page, true);
            };

            let outcome = match result {
                Some(body) => {
                    if self.persist_page(cursor, &body).await {
                        pages_saved += 1;
                    }
                    PageOutcome::Saved
                }
                None => PageOutcome::Exhausted,
            };

            state = state.transition(outcome);
        }

        tracing::debug!(
            "Gallery {} exhausted after {} pages",
            identifier,
            last_page.saturating_sub(1)
        );
        self.finish_gallery(identifier, pages_saved, last_page, false)
    }

    fn finish_gallery(
        &mut self,
        identifier: GalleryIdentifier,
        pages_saved: u32,
        last_page: u32,
        cancelled: bool,
    ) -> GalleryOutcome {
        if pages_saved > 0 {
            self.stats.galleries_found += 1;
        }

        GalleryOutcome {
            identifier,
            pages_saved,
            last_page,
            cancelled,
        }
    }

    /// Requests the cursor's page; `Some(body)` when it counts as a success
    async fn fetch_page(&self, cursor: &PageCursor) -> Option<Vec<u8>> {
        let url = match cursor.page_url(&self.config.page_url_template) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build URL for {}: {}", cursor.file_name(), e);
                return None;
            }
        };

        tracing::debug!("Fetching {}", url);
        self.classify(self.fetcher.fetch(&url).await)
    }

    /// Applies the success policy to a fetch result
    fn classify(&self, result: Result<FetchResponse, FetchError>) -> Option<Vec<u8>> {
        match result {
            Ok(response) if self.config.success_policy.accepts(response.status_code) => {
                Some(response.body)
            }
            Ok(response) => {
                tracing::debug!(
                    "HTTP {} for {}, gallery exhausted",
                    response.status_code,
                    response.final_url
                );
                None
            }
            Err(e) => {
                tracing::debug!("{}, gallery exhausted", e);
                None
            }
        }
    }

    /// Writes the page and its log record; failures are logged, never raised
    ///
    /// Returns true if the page file was written.
    async fn persist_page(&mut self, cursor: &PageCursor, body: &[u8]) -> bool {
        let path = match self.store.save(cursor, body).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Error saving image: {}", e);
                self.stats.storage_failures += 1;
                return false;
            }
        };

        self.stats.pages_saved += 1;
        tracing::info!(
            "Downloaded {} page {} ({} bytes) -> {}",
            cursor.identifier,
            cursor.page_number,
            body.len(),
            path.display()
        );

        if let Err(e) = self.log.append(&DownloadRecord::now(cursor)).await {
            tracing::error!("Error writing download log: {}", e);
            self.stats.storage_failures += 1;
        }

        true
    }
}
