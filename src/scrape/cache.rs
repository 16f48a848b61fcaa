//! Single-slot image cache
//!
//! Holds the most recently scraped image, optionally gzip-compressed. One
//! mutex guards the slot for the whole of `put` and `get`, including the
//! compression transform, so readers never observe a half-written value.

use crate::CacheError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The stored image and the form it is stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub bytes: Vec<u8>,
    pub compressed: bool,
}

impl CachedImage {
    /// Returns the raw, directly servable image bytes
    fn to_raw(&self) -> Result<Vec<u8>, CacheError> {
        if self.compressed {
            gunzip(&self.bytes)
        } else {
            Ok(self.bytes.clone())
        }
    }
}

/// Concurrency-safe single-slot store for the last scraped image
///
/// Every `put` replaces the slot. Concurrent scrapes therefore overwrite each
/// other; whichever `put` ran last is what `get` returns.
#[derive(Debug, Default)]
pub struct ImageCache {
    slot: Mutex<Option<CachedImage>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the slot with `raw`, gzip-compressing it first if requested
    ///
    /// On error the previous value is left in place.
    pub fn put(&self, raw: &[u8], use_compression: bool) -> Result<(), CacheError> {
        let mut slot = self.lock();

        let image = if use_compression {
            CachedImage {
                bytes: gzip(raw)?,
                compressed: true,
            }
        } else {
            CachedImage {
                bytes: raw.to_vec(),
                compressed: false,
            }
        };

        tracing::debug!(
            "Caching image: {} bytes raw, {} bytes stored",
            raw.len(),
            image.bytes.len()
        );

        *slot = Some(image);
        Ok(())
    }

    /// Returns the cached image as raw bytes
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The raw image
    /// * `Err(CacheError::Empty)` - Nothing has been stored yet
    /// * `Err(CacheError::Corrupt)` - The stored data failed to decompress
    pub fn get(&self) -> Result<Vec<u8>, CacheError> {
        let slot = self.lock();
        slot.as_ref().ok_or(CacheError::Empty)?.to_raw()
    }

    /// Returns true once an image has been stored
    pub fn is_populated(&self) -> bool {
        self.lock().is_some()
    }

    /// A panic while holding the lock cannot leave a partial image behind,
    /// since the slot is only ever assigned whole, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Option<CachedImage>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn replace_stored(&self, image: CachedImage) {
        *self.lock() = Some(image);
    }
}

fn gzip(data: &[u8]) -> Result<Vec<u8>, CacheError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(|source| CacheError::Corrupt { source })?;
    encoder
        .finish()
        .map_err(|source| CacheError::Corrupt { source })
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>, CacheError> {
    let mut decoder = GzDecoder::new(data);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|source| CacheError::Corrupt { source })?;
    Ok(raw)
}
