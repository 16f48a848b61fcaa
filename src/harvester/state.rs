//! Harvester state machine
//!
//! `NewIdentifier -> Fetching -> (Saved -> Fetching | Exhausted -> NewIdentifier)`.
//! There is no terminal state; the loop only stops on cancellation.

use crate::harvester::{GalleryIdentifier, PageCursor};

/// Current phase of the harvester loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestState {
    /// A fresh identifier must be drawn
    NewIdentifier,

    /// The page at the cursor is about to be requested
    Fetching(PageCursor),
}

/// Result of requesting one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page exists; move on to the next one
    Saved,

    /// The fetch failed; the gallery is treated as exhausted
    Exhausted,
}

impl HarvestState {
    /// Enters `Fetching` at page 1 of `identifier`
    pub fn start(identifier: GalleryIdentifier) -> Self {
        Self::Fetching(PageCursor::new(identifier))
    }

    /// Applies the outcome of the current fetch
    ///
    /// Outcomes received while waiting for an identifier are ignored.
    pub fn transition(self, outcome: PageOutcome) -> Self {
        match (self, outcome) {
            (Self::Fetching(mut cursor), PageOutcome::Saved) => {
                cursor.advance();
                Self::Fetching(cursor)
            }
            (Self::Fetching(_), PageOutcome::Exhausted) => Self::NewIdentifier,
            (Self::NewIdentifier, _) => Self::NewIdentifier,
        }
    }

    /// Returns the cursor while fetching
    pub fn cursor(&self) -> Option<&PageCursor> {
        match self {
            Self::Fetching(cursor) => Some(cursor),
            Self::NewIdentifier => None,
        }
    }
}
