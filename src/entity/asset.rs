use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chain served from the upstream metadata provider, with case-sensitive mints
pub const SOLANA_CHAIN: &str = "solana";

/// Token standard tag for Solana fungible tokens
pub const SPL_TOKEN_TYPE: &str = "SPL";

fn default_version() -> u32 {
    1
}

/// One token entry of a per-chain token list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub chain: String, // Chain name, lower case
    #[serde(rename = "tokenId")]
    pub token_id: String, // Contract or mint address
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "type", default)]
    pub token_type: String, // Token standard tag (e.g. "SPL", "ERC20")
    #[serde(default)]
    pub decimals: u32,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply: Option<String>, // Decimal string to keep full precision

    /// Fields present in the list file that this service does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetRecord {
    /// Copy restricted to the persisted schema
    pub fn sanitized(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            token_id: self.token_id.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            token_type: self.token_type.clone(),
            decimals: self.decimals,
            logo_uri: self.logo_uri.clone(),
            supply: self.supply.clone(),
            extra: Map::new(),
        }
    }

    /// Merges the defined fields of `incoming` into `self`.
    ///
    /// The stored `token_id` is kept as is. Optional fields only overwrite
    /// when the incoming record carries them. Returns true if any field changed.
    pub fn merge_from(&mut self, incoming: &AssetRecord) -> bool {
        let before = self.clone();

        self.chain = incoming.chain.clone();
        self.name = incoming.name.clone();
        self.symbol = incoming.symbol.clone();
        self.token_type = incoming.token_type.clone();
        self.decimals = incoming.decimals;
        if let Some(logo_uri) = &incoming.logo_uri {
            self.logo_uri = Some(logo_uri.clone());
        }
        if let Some(supply) = &incoming.supply {
            self.supply = Some(supply.clone());
        }

        *self != before
    }
}

/// Per-chain token list file (`tokenlists/<chain>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenListDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TokenListDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            assets: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Whether the chain compares token ids case-sensitively
pub fn is_solana(chain: &str) -> bool {
    chain.eq_ignore_ascii_case(SOLANA_CHAIN)
}

/// Compares two token ids with the chain's rule: exact for Solana, ASCII
/// case-insensitive elsewhere
pub fn token_ids_match(chain: &str, left: &str, right: &str) -> bool {
    if is_solana(chain) {
        left == right
    } else {
        left.eq_ignore_ascii_case(right)
    }
}

/// Finds the record for `token_id` using the chain's comparison rule
pub fn find_asset<'a>(
    assets: &'a [AssetRecord],
    chain: &str,
    token_id: &str,
) -> Option<&'a AssetRecord> {
    assets
        .iter()
        .find(|asset| token_ids_match(chain, &asset.token_id, token_id))
}

/// True when the value can be used as a single path segment
pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0'])
}
