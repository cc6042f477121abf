pub mod asset_interactor;

pub use asset_interactor::{AssetInteractor, AssetInteractorImpl};
