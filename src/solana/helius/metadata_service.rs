use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Map;

use crate::entity::{AssetRecord, SOLANA_CHAIN, SPL_TOKEN_TYPE};
use crate::solana::helius::models::{
    DisplayOptions, GetAssetParams, ProviderAsset, RpcRequest, RpcResponse,
    FUNGIBLE_TOKEN_INTERFACE,
};

/// Source of on-chain token metadata
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches the provider's view of the asset.
    ///
    /// Never fails: transport errors, bad statuses and unusable payloads all
    /// come back as `None`.
    async fn fetch_metadata(&self, token_id: &str) -> Option<ProviderAsset>;
}

/// Metadata provider backed by the Helius DAS `getAsset` method
pub struct HeliusMetadataService {
    http_client: Client,
    endpoint: String,
}

impl HeliusMetadataService {
    pub fn new(http_client: Client, endpoint: String) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }
}

#[async_trait]
impl MetadataProvider for HeliusMetadataService {
    async fn fetch_metadata(&self, token_id: &str) -> Option<ProviderAsset> {
        debug!("Requesting Helius metadata for {}", token_id);

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: "token-assets",
            method: "getAsset",
            params: GetAssetParams {
                id: token_id,
                display_options: DisplayOptions {
                    show_fungible: true,
                },
            },
        };

        let response = match self.http_client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Helius request for {} failed: {}", token_id, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Helius responded with {} for {}",
                response.status(),
                token_id
            );
            return None;
        }

        let body: RpcResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse Helius response for {}: {}", token_id, e);
                return None;
            }
        };

        if let Some(error) = body.error {
            warn!("Helius returned an error for {}: {}", token_id, error);
            return None;
        }

        if body.result.is_none() {
            info!("Helius has no usable result for {}", token_id);
        }

        body.result
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Maps a provider asset into a Solana asset record.
///
/// Returns `None` for anything other than a fungible token.
pub fn map_to_asset_record(token_id: &str, asset: &ProviderAsset) -> Option<AssetRecord> {
    if asset.interface.as_deref() != Some(FUNGIBLE_TOKEN_INTERFACE) {
        return None;
    }

    let content = asset.content.as_ref();
    let metadata = content.and_then(|c| c.metadata.as_ref());
    let token_info = asset.token_info.as_ref();

    let name = non_empty(metadata.and_then(|m| m.name.as_ref())).unwrap_or(token_id);
    let symbol = non_empty(metadata.and_then(|m| m.symbol.as_ref()))
        .or_else(|| non_empty(token_info.and_then(|t| t.symbol.as_ref())))
        .unwrap_or_default();

    let logo_uri = content
        .and_then(|c| non_empty(c.links.as_ref().and_then(|l| l.image.as_ref())))
        .or_else(|| {
            content
                .and_then(|c| c.files.as_ref())
                .and_then(|files| files.first())
                .and_then(|file| non_empty(file.uri.as_ref()))
        })
        .map(str::to_string);

    Some(AssetRecord {
        chain: SOLANA_CHAIN.to_string(),
        token_id: token_id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        token_type: SPL_TOKEN_TYPE.to_string(),
        decimals: token_info.and_then(|t| t.decimals).unwrap_or(0),
        logo_uri,
        supply: token_info.and_then(|t| t.supply.clone()),
        extra: Map::new(),
    })
}
