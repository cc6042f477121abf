use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Malformed token list {}: {source}", path.display())]
    TokenListParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

pub type AssetResult<T> = Result<T, AssetError>;
