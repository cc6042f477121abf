pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod logo;
pub mod repository;
pub mod router;
pub mod solana;

// Re-export commonly used items
pub use config::AppConfig;
pub use di::ServiceContainer;
pub use entity::{AssetError, AssetRecord, TokenListDocument};
pub use router::{AssetsRouter, Router};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
