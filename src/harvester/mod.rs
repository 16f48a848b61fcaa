//! Harvester module for the brute-force gallery walk
//!
//! The harvester draws a random gallery identifier, requests its pages in
//! order starting at 1, and abandons the identifier at the first failed fetch.
//!
//! # Components
//!
//! - `GalleryIdentifier`: fixed-width 6 digit identifier
//! - `PageCursor`: identifier plus current page number
//! - `HarvestState`: the `NewIdentifier -> Fetching` state machine
//! - `PageStore` / `DownloadLog`: page files and the append-only log
//! - `Harvester`: the loop driving all of the above

mod cursor;
mod identifier;
mod log;
mod state;
mod stats;
mod storage;
mod walker;

pub use cursor::{render_page_url, PageCursor};
pub use identifier::{GalleryIdentifier, IDENTIFIER_WIDTH, MAX_IDENTIFIER_SPACE};
pub use log::{DownloadLog, DownloadRecord, LOG_TIMESTAMP_FORMAT};
pub use state::{HarvestState, PageOutcome};
pub use stats::HarvestStats;
pub use storage::PageStore;
pub use walker::{GalleryOutcome, Harvester};
