use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Gallery-Harvester
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvester: HarvesterConfig,
    pub scraper: ScraperConfig,
    pub fetcher: FetcherConfig,
}

/// Which responses count as a downloaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessPolicy {
    /// Only 2xx responses are saved; anything else ends the gallery
    #[default]
    SuccessOnly,

    /// Any response without a transport error is saved
    Lenient,
}

impl SuccessPolicy {
    /// Returns true if a response with this status continues the gallery
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::SuccessOnly => (200..300).contains(&status),
            Self::Lenient => true,
        }
    }
}

/// Brute-force downloader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    /// Directory receiving page files and the download log
    #[serde(rename = "download-root")]
    pub download_root: PathBuf,

    /// File name of the append-only log inside the download root
    #[serde(rename = "log-file-name")]
    pub log_file_name: String,

    /// Page URL with `{id}` and `{page}` placeholders
    #[serde(rename = "page-url-template")]
    pub page_url_template: String,

    /// Identifiers are drawn uniformly from `[0, identifier_space)`
    #[serde(rename = "identifier-space")]
    pub identifier_space: u32,

    /// Pause after abandoning an identifier (milliseconds)
    #[serde(rename = "identifier-delay-ms")]
    pub identifier_delay_ms: u64,

    #[serde(rename = "success-policy")]
    pub success_policy: SuccessPolicy,

    /// Number of galleries between progress log lines
    #[serde(rename = "progress-interval")]
    pub progress_interval: u64,
}

impl HarvesterConfig {
    pub fn identifier_delay(&self) -> Duration {
        Duration::from_millis(self.identifier_delay_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        self.download_root.join(&self.log_file_name)
    }
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("nDownloads"),
            log_file_name: "downloaded.log".to_string(),
            page_url_template: "https://i.nhentai.net/galleries/{id}/{page}.jpg".to_string(),
            identifier_space: 1_000_000,
            identifier_delay_ms: 0,
            success_policy: SuccessPolicy::default(),
            progress_interval: 10,
        }
    }
}

/// Scrape proxy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Socket address the HTTP server binds to
    #[serde(rename = "listen-addr")]
    pub listen_addr: String,

    /// Externally visible base URL, used to build link and image references
    #[serde(rename = "public-base-url")]
    pub public_base_url: String,

    /// Store cached images gzip-compressed
    #[serde(rename = "compress-images")]
    pub compress_images: bool,

    /// File extensions (without the dot) accepted as JPEG images
    #[serde(rename = "image-extensions")]
    pub image_extensions: Vec<String>,
}

impl ScraperConfig {
    /// Prefix prepended to every discovered link, e.g. `http://localhost:7171/?url=`
    pub fn link_prefix(&self) -> String {
        format!("{}/?url=", self.public_base_url.trim_end_matches('/'))
    }

    /// URL clients use to download the cached image
    pub fn image_endpoint(&self) -> String {
        format!("{}/image", self.public_base_url.trim_end_matches('/'))
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:7171".to_string(),
            public_base_url: "http://localhost:7171".to_string(),
            compress_images: true,
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string()],
        }
    }
}

/// Outbound HTTP configuration shared by both subsystems
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Optional proxy, e.g. `socks5h://127.0.0.1:9150` for Tor
    pub proxy: Option<String>,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("gallery-harvester/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            proxy: None,
        }
    }
}
