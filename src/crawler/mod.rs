//! Crawler module for outbound fetching and HTML extraction
//!
//! This module provides the Fetcher capability both subsystems depend on:
//! - The `Fetcher` trait, the seam used to stub the network in tests
//! - `HttpFetcher`, the reqwest-backed implementation
//! - HTML parsing that extracts anchor and image references

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, FetchResponse, FetchedPage, Fetcher, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
