pub mod cdn_fallback;
pub mod fetcher;
pub mod logo_cache;
pub mod uri;

pub use cdn_fallback::{CdnFallbackResolver, LogoResolution, LogoSource};
pub use fetcher::{HttpLogoFetcher, LogoFetcher};
pub use logo_cache::{LogoCache, LOGO_FILE_NAME};
pub use uri::{decode_data_uri, is_data_uri, UriGateways};
