use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use crate::entity::{is_valid_identifier, AssetError, AssetRecord, AssetResult};
use crate::logo::fetcher::LogoFetcher;
use crate::logo::uri::{decode_data_uri, is_data_uri, UriGateways};

/// File name every cached logo is stored under
pub const LOGO_FILE_NAME: &str = "logo.png";

/// Local store of logo images under `<root>/blockchains/<chain>/assets/<tokenId>/`
pub struct LogoCache {
    root_dir: PathBuf,
    gateways: UriGateways,
    fetcher: Arc<dyn LogoFetcher + Send + Sync>,
}

impl LogoCache {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        gateways: UriGateways,
        fetcher: Arc<dyn LogoFetcher + Send + Sync>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            gateways,
            fetcher,
        }
    }

    pub fn gateways(&self) -> &UriGateways {
        &self.gateways
    }

    fn check_identifiers(chain: &str, token_id: &str, file_name: &str) -> AssetResult<()> {
        for value in [chain, token_id, file_name] {
            if !is_valid_identifier(value) {
                return Err(AssetError::InvalidIdentifier(value.to_string()));
            }
        }
        Ok(())
    }

    /// Path of the logo on disk
    pub fn file_path(&self, chain: &str, token_id: &str, file_name: &str) -> AssetResult<PathBuf> {
        Self::check_identifiers(chain, token_id, file_name)?;
        Ok(self
            .root_dir
            .join("blockchains")
            .join(chain)
            .join("assets")
            .join(token_id)
            .join(file_name))
    }

    /// URL path the static layer serves the logo under
    pub fn public_path(chain: &str, token_id: &str, file_name: &str) -> String {
        format!("/blockchains/{}/assets/{}/{}", chain, token_id, file_name)
    }

    /// Writes logo bytes to their canonical location, creating directories
    pub async fn store(
        &self,
        chain: &str,
        token_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> AssetResult<PathBuf> {
        let path = self.file_path(chain, token_id, file_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        info!("Cached logo {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Makes the asset's logo available locally and returns its public path.
    ///
    /// `Ok(None)` means there is nothing to cache: no logo URI, or a data URI
    /// that cannot be decoded. A failed download is an error.
    pub async fn resolve_and_cache_logo(&self, asset: &AssetRecord) -> AssetResult<Option<String>> {
        let Some(logo_uri) = asset.logo_uri.as_deref().filter(|uri| !uri.is_empty()) else {
            return Ok(None);
        };
        let uri = self.gateways.normalize(logo_uri);

        let chain = asset.chain.as_str();
        let token_id = asset.token_id.as_str();
        let path = self.file_path(chain, token_id, LOGO_FILE_NAME)?;
        let public_path = Self::public_path(chain, token_id, LOGO_FILE_NAME);

        if fs::try_exists(&path).await? {
            debug!("Logo cache hit for {}/{}", chain, token_id);
            return Ok(Some(public_path));
        }

        let bytes = if is_data_uri(&uri) {
            match decode_data_uri(&uri) {
                Some(bytes) => bytes,
                None => return Ok(None),
            }
        } else {
            self.fetcher.fetch(&uri).await?
        };

        self.store(chain, token_id, LOGO_FILE_NAME, &bytes).await?;

        Ok(Some(public_path))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::Map;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Serves canned bodies and records every requested URL
    #[derive(Default)]
    pub(crate) struct StubFetcher {
        pub responses: HashMap<String, Vec<u8>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn with<B: AsRef<[u8]>>(responses: &[(&str, B)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.as_ref().to_vec()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogoFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| AssetError::UpstreamStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn asset(logo_uri: Option<&str>) -> AssetRecord {
        AssetRecord {
            chain: "solana".to_string(),
            token_id: "MintXYZ".to_string(),
            name: "Xyz".to_string(),
            symbol: "XYZ".to_string(),
            token_type: "SPL".to_string(),
            decimals: 6,
            logo_uri: logo_uri.map(str::to_string),
            supply: None,
            extra: Map::new(),
        }
    }

    fn cache(root: &std::path::Path, fetcher: Arc<StubFetcher>) -> LogoCache {
        LogoCache::new(root, UriGateways::from_config(&AppConfig::default()), fetcher)
    }

    #[tokio::test]
    async fn data_uri_round_trips_to_disk() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(StubFetcher::default());
        let cache = cache(dir.path(), fetcher.clone());

        let bytes: Vec<u8> = (0u8..=255).rev().collect();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));

        let path = cache.resolve_and_cache_logo(&asset(Some(&uri))).await.unwrap();
        assert_eq!(
            path.as_deref(),
            Some("/blockchains/solana/assets/MintXYZ/logo.png")
        );
        let stored =
            std::fs::read(dir.path().join("blockchains/solana/assets/MintXYZ/logo.png")).unwrap();
        assert_eq!(stored, bytes);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn ipfs_logo_is_fetched_through_gateway() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(StubFetcher::with(&[(
            "https://ipfs.io/ipfs/Qm123",
            b"png-bytes",
        )]));
        let cache = cache(dir.path(), fetcher.clone());

        let path = cache
            .resolve_and_cache_logo(&asset(Some("ipfs://Qm123")))
            .await
            .unwrap();
        assert!(path.is_some());
        assert_eq!(fetcher.requested(), vec!["https://ipfs.io/ipfs/Qm123"]);
    }

    #[tokio::test]
    async fn existing_file_is_a_cache_hit_without_network() {
        let dir = tempdir().unwrap();
        let logo_dir = dir.path().join("blockchains/solana/assets/MintXYZ");
        std::fs::create_dir_all(&logo_dir).unwrap();
        std::fs::write(logo_dir.join("logo.png"), b"old").unwrap();

        let fetcher = Arc::new(StubFetcher::default());
        let cache = cache(dir.path(), fetcher.clone());

        let path = cache
            .resolve_and_cache_logo(&asset(Some("https://example.com/new.png")))
            .await
            .unwrap();
        assert!(path.is_some());
        assert!(fetcher.requested().is_empty());
        assert_eq!(std::fs::read(logo_dir.join("logo.png")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn missing_uri_and_malformed_data_uri_yield_none() {
        let dir = tempdir().unwrap();
        let cache = cache(dir.path(), Arc::new(StubFetcher::default()));

        assert!(cache.resolve_and_cache_logo(&asset(None)).await.unwrap().is_none());
        assert!(cache
            .resolve_and_cache_logo(&asset(Some("data:image/png;base64")))
            .await
            .unwrap()
            .is_none());
        assert!(!dir.path().join("blockchains/solana/assets/MintXYZ/logo.png").exists());
    }

    #[tokio::test]
    async fn failed_download_is_an_error() {
        let dir = tempdir().unwrap();
        let cache = cache(dir.path(), Arc::new(StubFetcher::default()));

        let err = cache
            .resolve_and_cache_logo(&asset(Some("https://example.com/missing.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::UpstreamStatus { status: 404, .. }));
    }
}
