use gallery_harvester::config::{FetcherConfig, HarvesterConfig, ScraperConfig};
use gallery_harvester::crawler::HttpFetcher;
use std::path::Path;

/// Fetcher with short timeouts, suitable for local mock servers
pub fn test_fetcher() -> HttpFetcher {
    let config = FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    };
    HttpFetcher::new(&config).expect("Failed to build fetcher")
}

/// Harvester configuration pointing at `base_url`
pub fn harvester_config(root: &Path, base_url: &str) -> HarvesterConfig {
    HarvesterConfig {
        download_root: root.to_path_buf(),
        page_url_template: format!("{}/galleries/{{id}}/{{page}}.jpg", base_url),
        ..HarvesterConfig::default()
    }
}

/// Scraper configuration with a fixed public base URL
pub fn scraper_config() -> ScraperConfig {
    ScraperConfig {
        public_base_url: "http://proxy.test:7171".to_string(),
        ..ScraperConfig::default()
    }
}

/// Percent-encodes a value for use in a query string
pub fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Reads the download log into lines
pub fn read_log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
