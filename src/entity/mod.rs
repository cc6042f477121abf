mod asset;
mod asset_error;

pub use asset::{
    find_asset, is_solana, is_valid_identifier, token_ids_match, AssetRecord, TokenListDocument,
    SOLANA_CHAIN, SPL_TOKEN_TYPE,
};
pub use asset_error::{AssetError, AssetResult};
