//! Configuration module for Gallery-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section and key is optional; missing values fall back to the defaults
//! documented on each field.
//!
//! # Example
//!
//! ```no_run
//! use gallery_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Downloading into: {}", config.harvester.download_root.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, HarvesterConfig, ScraperConfig, SuccessPolicy};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
