// src/solana/helius/mod.rs
pub mod metadata_service;
pub mod models;

pub use metadata_service::{map_to_asset_record, HeliusMetadataService, MetadataProvider};
pub use models::{ProviderAsset, FUNGIBLE_TOKEN_INTERFACE};
