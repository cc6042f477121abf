// Re-export everything from submodules
pub mod helius;

// Re-export commonly used items
pub use helius::{map_to_asset_record, HeliusMetadataService, MetadataProvider, ProviderAsset};
