use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_HELIUS_RPC_URL: &str = "https://mainnet.helius-rpc.com";
const DEFAULT_TRUST_CDN_URL: &str = "https://assets-cdn.trustwallet.com";
const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const DEFAULT_ARWEAVE_GATEWAY: &str = "https://arweave.net/";

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind the HTTP server to
    pub host: String,

    /// Port to bind the HTTP server to
    pub port: u16,

    /// Directory holding `tokenlists/` and `blockchains/`
    pub root_dir: PathBuf,

    /// Helius JSON-RPC endpoint
    pub helius_rpc_url: String,

    /// Helius API key, appended to the endpoint when set
    pub helius_api_key: String,

    /// Base URL of the Trust Wallet assets CDN
    pub trust_cdn_url: String,

    /// Prefix that replaces `ipfs://`
    pub ipfs_gateway: String,

    /// Prefix that replaces `ar://`
    pub arweave_gateway: String,

    /// User-Agent sent on every outbound logo request
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_dir: PathBuf::from("."),
            helius_rpc_url: DEFAULT_HELIUS_RPC_URL.to_string(),
            helius_api_key: String::new(),
            trust_cdn_url: DEFAULT_TRUST_CDN_URL.to_string(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            arweave_gateway: DEFAULT_ARWEAVE_GATEWAY.to_string(),
            user_agent: format!("token-assets-server/{}", crate::VERSION),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT value {:?}, using {}", value, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            root_dir: env::var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.root_dir),
            helius_rpc_url: env::var("HELIUS_RPC_URL").unwrap_or(defaults.helius_rpc_url),
            helius_api_key: env::var("HELIUS_API_KEY").unwrap_or(defaults.helius_api_key),
            trust_cdn_url: env::var("TRUST_CDN_URL").unwrap_or(defaults.trust_cdn_url),
            ipfs_gateway: env::var("IPFS_GATEWAY").unwrap_or(defaults.ipfs_gateway),
            arweave_gateway: env::var("ARWEAVE_GATEWAY").unwrap_or(defaults.arweave_gateway),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Directory of the per-chain token list documents
    pub fn token_lists_dir(&self) -> PathBuf {
        self.root_dir.join("tokenlists")
    }

    /// Full Helius RPC URL including the API key
    pub fn helius_endpoint(&self) -> String {
        if self.helius_api_key.is_empty() {
            self.helius_rpc_url.clone()
        } else {
            format!("{}/?api-key={}", self.helius_rpc_url.trim_end_matches('/'), self.helius_api_key)
        }
    }
}
