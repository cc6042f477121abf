// src/solana/helius/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interface tag the provider reports for fungible SPL tokens
pub const FUNGIBLE_TOKEN_INTERFACE: &str = "FungibleToken";

// Decodes an optional field, treating a value of the wrong shape as absent
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| serde_json::from_value(v).ok()))
    }
}

// Like `lenient`, for struct fields: anything but a JSON object is absent.
// Derived structs would otherwise accept a sequence of fields.
pub mod lenient_object {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }
}

// Decodes an integer or digit string into its decimal string form
pub mod decimal_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|v| v.to_string())
                .or_else(|| n.as_i64().map(|v| v.to_string())),
            Some(Value::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                Some(s)
            }
            _ => None,
        })
    }
}

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'static str,
    pub params: P,
}

/// Parameters of the `getAsset` call
#[derive(Debug, Serialize)]
pub struct GetAssetParams<'a> {
    pub id: &'a str,
    #[serde(rename = "displayOptions")]
    pub display_options: DisplayOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub show_fungible: bool,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default, deserialize_with = "lenient_object::deserialize")]
    pub result: Option<ProviderAsset>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Asset as reported by the provider's `getAsset`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAsset {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub interface: Option<String>,
    #[serde(default, deserialize_with = "lenient_object::deserialize")]
    pub content: Option<AssetContent>,
    #[serde(default, deserialize_with = "lenient_object::deserialize")]
    pub token_info: Option<TokenInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetContent {
    #[serde(default, deserialize_with = "lenient_object::deserialize")]
    pub metadata: Option<ContentMetadata>,
    #[serde(default, deserialize_with = "lenient_object::deserialize")]
    pub links: Option<ContentLinks>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub files: Option<Vec<ContentFile>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentMetadata {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentLinks {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFile {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenInfo {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub decimals: Option<u32>,
    #[serde(default, deserialize_with = "decimal_string::deserialize")]
    pub supply: Option<String>,
}
