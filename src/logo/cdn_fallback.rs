use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinHandle;

use crate::entity::{is_solana, AssetRecord};
use crate::interactor::AssetInteractor;
use crate::logo::fetcher::LogoFetcher;
use crate::logo::logo_cache::{LogoCache, LOGO_FILE_NAME};
use crate::logo::uri::{decode_data_uri, is_data_uri};
use crate::solana::helius::{map_to_asset_record, MetadataProvider};

/// Where a fallback logo came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSource {
    TrustWalletCdn,
    HeliusMetadata,
}

impl LogoSource {
    /// Value of the `X-Cached-From` response header
    pub fn header_value(&self) -> &'static str {
        match self {
            Self::TrustWalletCdn => "trustwallet-cdn",
            Self::HeliusMetadata => "helius-metadata",
        }
    }
}

/// Result of resolving a logo that was requested directly
#[derive(Debug)]
pub enum LogoResolution {
    /// The file exists locally; the static layer should serve it
    Local(PathBuf),
    /// Fetched from an upstream source; `persistence` writes it to disk in the background
    Fetched {
        bytes: Vec<u8>,
        source: LogoSource,
        persistence: JoinHandle<()>,
    },
    NotFound,
}

/// Fills in logo files missing locally from the Trust Wallet CDN, then
/// (Solana only) from the logo named by on-chain metadata
pub struct CdnFallbackResolver {
    cdn_base_url: String,
    fetcher: Arc<dyn LogoFetcher + Send + Sync>,
    metadata_provider: Arc<dyn MetadataProvider + Send + Sync>,
    logo_cache: Arc<LogoCache>,
    asset_interactor: Arc<dyn AssetInteractor + Send + Sync>,
}

impl CdnFallbackResolver {
    pub fn new(
        cdn_base_url: String,
        fetcher: Arc<dyn LogoFetcher + Send + Sync>,
        metadata_provider: Arc<dyn MetadataProvider + Send + Sync>,
        logo_cache: Arc<LogoCache>,
        asset_interactor: Arc<dyn AssetInteractor + Send + Sync>,
    ) -> Self {
        Self {
            cdn_base_url,
            fetcher,
            metadata_provider,
            logo_cache,
            asset_interactor,
        }
    }

    fn cdn_url(&self, chain: &str, token_id: &str, file_name: &str) -> String {
        format!(
            "{}/blockchains/{}/assets/{}/{}",
            self.cdn_base_url.trim_end_matches('/'),
            chain,
            token_id,
            file_name
        )
    }

    pub async fn resolve(&self, chain: &str, token_id: &str, file_name: &str) -> LogoResolution {
        let chain = chain.to_lowercase();
        let chain = chain.as_str();

        let path = match self.logo_cache.file_path(chain, token_id, file_name) {
            Ok(path) => path,
            Err(e) => {
                warn!("Rejecting logo request: {}", e);
                return LogoResolution::NotFound;
            }
        };

        if fs::try_exists(&path).await.unwrap_or(false) {
            return LogoResolution::Local(path);
        }

        let url = self.cdn_url(chain, token_id, file_name);
        match self.fetcher.fetch(&url).await {
            Ok(bytes) => {
                info!("Fetched {}/{}/{} from Trust Wallet CDN", chain, token_id, file_name);
                let persistence = self.spawn_store(chain, token_id, file_name, bytes.clone(), None);
                return LogoResolution::Fetched {
                    bytes,
                    source: LogoSource::TrustWalletCdn,
                    persistence,
                };
            }
            Err(e) => info!("Trust Wallet CDN miss for {}: {}", url, e),
        }

        // Metadata images only back the canonical logo the asset record points at
        if !is_solana(chain) || file_name != LOGO_FILE_NAME {
            return LogoResolution::NotFound;
        }

        match self.fetch_from_metadata(token_id).await {
            Some((bytes, asset)) => {
                info!("Fetched logo for {} via Helius metadata", token_id);
                let persistence =
                    self.spawn_store(chain, token_id, file_name, bytes.clone(), Some(asset));
                LogoResolution::Fetched {
                    bytes,
                    source: LogoSource::HeliusMetadata,
                    persistence,
                }
            }
            None => LogoResolution::NotFound,
        }
    }

    async fn fetch_from_metadata(&self, token_id: &str) -> Option<(Vec<u8>, AssetRecord)> {
        let provider_asset = self.metadata_provider.fetch_metadata(token_id).await?;
        let asset = map_to_asset_record(token_id, &provider_asset)?;
        let logo_uri = asset.logo_uri.as_deref()?;
        let uri = self.logo_cache.gateways().normalize(logo_uri);

        let bytes = if is_data_uri(&uri) {
            decode_data_uri(&uri)?
        } else {
            match self.fetcher.fetch(&uri).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Metadata logo fetch for {} failed: {}", token_id, e);
                    return None;
                }
            }
        };

        Some((bytes, asset))
    }

    // Writes the logo, then records the asset so later metadata lookups hit
    // the token list. The logo is on disk before persistence runs, so the
    // asset's logo resolves as a cache hit. Runs detached; failures are logged.
    fn spawn_store(
        &self,
        chain: &str,
        token_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        asset: Option<AssetRecord>,
    ) -> JoinHandle<()> {
        let logo_cache = self.logo_cache.clone();
        let asset_interactor = self.asset_interactor.clone();
        let chain = chain.to_string();
        let token_id = token_id.to_string();
        let file_name = file_name.to_string();

        tokio::spawn(async move {
            if let Err(e) = logo_cache.store(&chain, &token_id, &file_name, &bytes).await {
                error!("Failed to cache {}/{}/{}: {}", chain, token_id, file_name, e);
            }
            if let Some(asset) = asset {
                asset_interactor.persist_solana_asset(asset).await;
            }
        })
    }
}
