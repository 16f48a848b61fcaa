use crate::config::types::{Config, FetcherConfig, HarvesterConfig, ScraperConfig};
use crate::harvester::{render_page_url, GalleryIdentifier, MAX_IDENTIFIER_SPACE};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_scraper_config(&config.scraper)?;
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

/// Validates harvester configuration
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.identifier_space < 1 || config.identifier_space > MAX_IDENTIFIER_SPACE {
        return Err(ConfigError::Validation(format!(
            "identifier_space must be between 1 and {}, got {}",
            MAX_IDENTIFIER_SPACE, config.identifier_space
        )));
    }

    if config.download_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download_root cannot be empty".to_string(),
        ));
    }

    if config.log_file_name.is_empty() {
        return Err(ConfigError::Validation(
            "log_file_name cannot be empty".to_string(),
        ));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(
            "progress_interval must be >= 1".to_string(),
        ));
    }

    validate_page_url_template(&config.page_url_template)
}

/// Validates the page URL template by rendering a sample page
fn validate_page_url_template(template: &str) -> Result<(), ConfigError> {
    for placeholder in ["{id}", "{page}"] {
        if !template.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "page_url_template must contain '{}', got '{}'",
                placeholder, template
            )));
        }
    }

    let sample = GalleryIdentifier::from_number(0);
    render_page_url(template, &sample, 1).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid page_url_template '{}': {}", template, e))
    })?;

    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    config.listen_addr.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "listen_addr '{}' is not a socket address: {}",
            config.listen_addr, e
        ))
    })?;

    let base = Url::parse(&config.public_base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid public_base_url '{}': {}",
            config.public_base_url, e
        ))
    })?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "public_base_url must use http or https, got '{}'",
            config.public_base_url
        )));
    }

    if config.image_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "image_extensions must list at least one extension".to_string(),
        ));
    }

    if let Some(bad) = config
        .image_extensions
        .iter()
        .find(|ext| ext.is_empty() || ext.starts_with('.'))
    {
        return Err(ConfigError::Validation(format!(
            "image extension '{}' must be non-empty and given without a leading dot",
            bad
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs and connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    Ok(())
}
