use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::FetchError;

const USER_AGENT: &str = concat!("beer_styles/", env!("CARGO_PKG_VERSION"));

/// Listing URL for a style, sorted by review count descending.
pub fn style_url(base_url: &str, style_id: i64) -> String {
    format!("{}/{}/?sort=revsD", base_url.trim_end_matches('/'), style_id)
}

/// Where listing pages come from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}
