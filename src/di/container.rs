use std::sync::Arc;

use reqwest::Client;

use crate::config::AppConfig;
use crate::interactor::{AssetInteractor, AssetInteractorImpl};
use crate::logo::{CdnFallbackResolver, HttpLogoFetcher, LogoCache, LogoFetcher, UriGateways};
use crate::repository::{FileTokenListRepository, TokenListRepository};
use crate::solana::helius::{HeliusMetadataService, MetadataProvider};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Services
    asset_interactor: Arc<dyn AssetInteractor + Send + Sync>,
    cdn_fallback: Arc<CdnFallbackResolver>,

    // Configuration
    config: AppConfig,
}

impl ServiceContainer {
    /// Create a container wired to the real filesystem and upstream services
    pub fn new(config: AppConfig) -> Self {
        let http_client = Client::new();

        let metadata_provider = Arc::new(HeliusMetadataService::new(
            http_client.clone(),
            config.helius_endpoint(),
        )) as Arc<dyn MetadataProvider + Send + Sync>;

        let logo_fetcher = Arc::new(HttpLogoFetcher::new(
            http_client,
            config.user_agent.clone(),
        )) as Arc<dyn LogoFetcher + Send + Sync>;

        Self::with_collaborators(config, metadata_provider, logo_fetcher)
    }

    /// Create a container around the given upstream collaborators
    pub fn with_collaborators(
        config: AppConfig,
        metadata_provider: Arc<dyn MetadataProvider + Send + Sync>,
        logo_fetcher: Arc<dyn LogoFetcher + Send + Sync>,
    ) -> Self {
        let token_list_repository = Arc::new(FileTokenListRepository::new(
            config.token_lists_dir(),
        )) as Arc<dyn TokenListRepository + Send + Sync>;

        let logo_cache = Arc::new(LogoCache::new(
            config.root_dir.clone(),
            UriGateways::from_config(&config),
            logo_fetcher.clone(),
        ));

        let asset_interactor = Arc::new(AssetInteractorImpl::new(
            token_list_repository,
            metadata_provider.clone(),
            logo_cache.clone(),
        )) as Arc<dyn AssetInteractor + Send + Sync>;

        let cdn_fallback = Arc::new(CdnFallbackResolver::new(
            config.trust_cdn_url.clone(),
            logo_fetcher,
            metadata_provider,
            logo_cache,
            asset_interactor.clone(),
        ));

        Self {
            asset_interactor,
            cdn_fallback,
            config,
        }
    }

    // Accessor methods

    pub fn asset_interactor(&self) -> Arc<dyn AssetInteractor + Send + Sync> {
        self.asset_interactor.clone()
    }

    pub fn cdn_fallback(&self) -> Arc<CdnFallbackResolver> {
        self.cdn_fallback.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
