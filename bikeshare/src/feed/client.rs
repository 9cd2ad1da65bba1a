//! Station feed HTTP client.

use super::error::FeedError;
use super::types::{StationDto, StationFeed};

/// Default production feed endpoint.
pub const DEFAULT_FEED_URL: &str = "http://bayareabikeshare.com/stations/json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed endpoint URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config pointing at the default production feed.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom feed URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the station feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// The endpoint this client fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current feed with a single GET.
    ///
    /// A non-success status fails with [`FeedError::Api`] carrying the status
    /// code; a body that is not a valid feed document fails with
    /// [`FeedError::Json`]. No retries, no caching of the raw response.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, FeedError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let feed: StationFeed = serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })?;

        Ok(feed.station_bean_list)
    }
}
