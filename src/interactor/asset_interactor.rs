use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::entity::{find_asset, is_solana, is_valid_identifier, AssetRecord, AssetResult};
use crate::logo::LogoCache;
use crate::repository::TokenListRepository;
use crate::solana::helius::{map_to_asset_record, MetadataProvider};

#[async_trait]
pub trait AssetInteractor: Send + Sync {
    /// Resolves an asset from the local token list, then the metadata provider.
    ///
    /// `Ok(None)` when no source knows the asset; `Err` only for broken local state.
    async fn get_asset(&self, chain: &str, token_id: &str) -> AssetResult<Option<AssetRecord>>;

    /// Caches the logo and upserts the asset, both best effort.
    ///
    /// Returns the asset with `logo_uri` pointing at the local copy when caching succeeded.
    async fn persist_solana_asset(&self, asset: AssetRecord) -> AssetRecord;
}

pub struct AssetInteractorImpl {
    token_lists: Arc<dyn TokenListRepository + Send + Sync>,
    metadata_provider: Arc<dyn MetadataProvider + Send + Sync>,
    logo_cache: Arc<LogoCache>,
}

impl AssetInteractorImpl {
    pub fn new(
        token_lists: Arc<dyn TokenListRepository + Send + Sync>,
        metadata_provider: Arc<dyn MetadataProvider + Send + Sync>,
        logo_cache: Arc<LogoCache>,
    ) -> Self {
        Self {
            token_lists,
            metadata_provider,
            logo_cache,
        }
    }
}

#[async_trait]
impl AssetInteractor for AssetInteractorImpl {
    async fn get_asset(&self, chain: &str, token_id: &str) -> AssetResult<Option<AssetRecord>> {
        let chain = chain.to_lowercase();
        if !is_valid_identifier(&chain) || !is_valid_identifier(token_id) {
            return Ok(None);
        }

        if let Some(assets) = self.token_lists.load(&chain).await? {
            if let Some(asset) = find_asset(&assets, &chain, token_id) {
                info!("Serving {}/{} from token list", chain, token_id);
                return Ok(Some(asset.clone()));
            }
        }

        if !is_solana(&chain) {
            return Ok(None);
        }

        let Some(provider_asset) = self.metadata_provider.fetch_metadata(token_id).await else {
            return Ok(None);
        };
        let Some(asset) = map_to_asset_record(token_id, &provider_asset) else {
            info!("Helius asset {} is not a fungible token", token_id);
            return Ok(None);
        };

        Ok(Some(self.persist_solana_asset(asset).await))
    }

    async fn persist_solana_asset(&self, mut asset: AssetRecord) -> AssetRecord {
        match self.logo_cache.resolve_and_cache_logo(&asset).await {
            Ok(Some(local_path)) => asset.logo_uri = Some(local_path),
            Ok(None) => {}
            Err(e) => warn!("Failed to cache logo for {}: {}", asset.token_id, e),
        }

        let chain = asset.chain.clone();
        if let Err(e) = self.token_lists.upsert(&chain, &asset).await {
            warn!(
                "Failed to persist {}/{} to token list: {}",
                chain, asset.token_id, e
            );
        }

        asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::entity::AssetError;
    use crate::logo::logo_cache::tests::StubFetcher;
    use crate::logo::UriGateways;
    use crate::repository::FileTokenListRepository;
    use crate::solana::helius::metadata_service::tests::StubMetadataProvider;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    fn interactor(
        root: &Path,
        provider: Arc<StubMetadataProvider>,
        fetcher: Arc<StubFetcher>,
    ) -> AssetInteractorImpl {
        let gateways = UriGateways::from_config(&AppConfig::default());
        AssetInteractorImpl::new(
            Arc::new(FileTokenListRepository::new(root.join("tokenlists"))),
            provider,
            Arc::new(LogoCache::new(root, gateways, fetcher)),
        )
    }

    fn fungible_xyz() -> serde_json::Value {
        json!({
            "interface": "FungibleToken",
            "content": {
                "metadata": { "name": "Xyz", "symbol": "XYZ" },
                "links": { "image": "https://img.example/xyz.png" }
            },
            "token_info": { "decimals": 6, "supply": 42 }
        })
    }

    #[tokio::test]
    async fn evm_lookup_is_case_insensitive() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tokenlists")).unwrap();
        std::fs::write(
            dir.path().join("tokenlists/ethereum.json"),
            r#"{"version":1,"assets":[{"chain":"ethereum","tokenId":"0xdeadbeef",
                "name":"Dead","symbol":"DEAD","type":"ERC20","decimals":18}]}"#,
        )
        .unwrap();
        let provider = Arc::new(StubMetadataProvider::default());
        let service = interactor(dir.path(), provider.clone(), Arc::new(StubFetcher::default()));

        let asset = service.get_asset("Ethereum", "0xDEADBEEF").await.unwrap().unwrap();
        assert_eq!(asset.symbol, "DEAD");
        assert!(provider.lookups().is_empty());
    }

    #[tokio::test]
    async fn unknown_chain_without_list_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = Arc::new(StubMetadataProvider::default());
        let service = interactor(dir.path(), provider.clone(), Arc::new(StubFetcher::default()));

        assert!(service.get_asset("polygon", "0xabc").await.unwrap().is_none());
        assert!(provider.lookups().is_empty());
    }

    #[tokio::test]
    async fn solana_miss_resolves_persists_and_then_hits_locally() {
        let dir = tempdir().unwrap();
        let provider = Arc::new(StubMetadataProvider::with("MintXYZ", fungible_xyz()));
        let fetcher = Arc::new(StubFetcher::with(&[(
            "https://img.example/xyz.png",
            b"xyz-logo",
        )]));
        let service = interactor(dir.path(), provider.clone(), fetcher);

        let asset = service.get_asset("solana", "MintXYZ").await.unwrap().unwrap();
        assert_eq!(asset.token_type, "SPL");
        assert_eq!(asset.symbol, "XYZ");
        assert_eq!(asset.supply.as_deref(), Some("42"));
        assert_eq!(
            asset.logo_uri.as_deref(),
            Some("/blockchains/solana/assets/MintXYZ/logo.png")
        );
        assert_eq!(
            std::fs::read(dir.path().join("blockchains/solana/assets/MintXYZ/logo.png")).unwrap(),
            b"xyz-logo"
        );

        let raw = std::fs::read_to_string(dir.path().join("tokenlists/solana.json")).unwrap();
        assert!(raw.contains("\"tokenId\": \"MintXYZ\""));

        let again = service.get_asset("solana", "MintXYZ").await.unwrap().unwrap();
        assert_eq!(again, asset);
        assert_eq!(provider.lookups(), vec!["MintXYZ"]);
    }

    #[tokio::test]
    async fn logo_failure_does_not_block_resolution() {
        let dir = tempdir().unwrap();
        let provider = Arc::new(StubMetadataProvider::with("MintXYZ", fungible_xyz()));
        let service = interactor(dir.path(), provider, Arc::new(StubFetcher::default()));

        let asset = service.get_asset("solana", "MintXYZ").await.unwrap().unwrap();
        assert_eq!(asset.logo_uri.as_deref(), Some("https://img.example/xyz.png"));
        assert!(dir.path().join("tokenlists/solana.json").exists());
    }

    #[tokio::test]
    async fn solana_lookup_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let provider = Arc::new(StubMetadataProvider::with("MintXYZ", fungible_xyz()));
        let service = interactor(dir.path(), provider.clone(), Arc::new(StubFetcher::default()));

        service.get_asset("solana", "MintXYZ").await.unwrap().unwrap();
        assert!(service.get_asset("solana", "mintxyz").await.unwrap().is_none());
        assert_eq!(provider.lookups(), vec!["MintXYZ", "mintxyz"]);
    }

    #[tokio::test]
    async fn non_fungible_solana_asset_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = Arc::new(StubMetadataProvider::with(
            "NftMint",
            json!({ "interface": "V1_NFT" }),
        ));
        let service = interactor(dir.path(), provider, Arc::new(StubFetcher::default()));

        assert!(service.get_asset("solana", "NftMint").await.unwrap().is_none());
        assert!(!dir.path().join("tokenlists/solana.json").exists());
    }

    #[tokio::test]
    async fn corrupt_token_list_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tokenlists")).unwrap();
        std::fs::write(dir.path().join("tokenlists/solana.json"), "[").unwrap();
        let provider = Arc::new(StubMetadataProvider::with("MintXYZ", fungible_xyz()));
        let service = interactor(dir.path(), provider.clone(), Arc::new(StubFetcher::default()));

        let err = service.get_asset("solana", "MintXYZ").await.unwrap_err();
        assert!(matches!(err, AssetError::TokenListParse { .. }));
        assert!(provider.lookups().is_empty());
    }
}
