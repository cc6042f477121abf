use async_trait::async_trait;
use log::debug;
use reqwest::header::USER_AGENT;
use reqwest::Client;

use crate::entity::{AssetError, AssetResult};

/// Downloads logo images
#[async_trait]
pub trait LogoFetcher: Send + Sync {
    /// Fetches the body at `url`; a non-success status is an error
    async fn fetch(&self, url: &str) -> AssetResult<Vec<u8>>;
}

/// Logo fetcher over reqwest that identifies itself with a fixed User-Agent
pub struct HttpLogoFetcher {
    http_client: Client,
    user_agent: String,
}

impl HttpLogoFetcher {
    pub fn new(http_client: Client, user_agent: String) -> Self {
        Self {
            http_client,
            user_agent,
        }
    }
}

#[async_trait]
impl LogoFetcher for HttpLogoFetcher {
    async fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
        debug!("Fetching logo from {}", url);

        let response = self
            .http_client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
