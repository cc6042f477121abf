use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use crate::config::AppConfig;

const IPFS_SCHEME: &str = "ipfs://";
const ARWEAVE_SCHEME: &str = "ar://";
const DATA_SCHEME: &str = "data:";

/// HTTP gateways for content-addressed logo URIs
#[derive(Debug, Clone)]
pub struct UriGateways {
    pub ipfs: String,
    pub arweave: String,
}

impl UriGateways {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ipfs: config.ipfs_gateway.clone(),
            arweave: config.arweave_gateway.clone(),
        }
    }

    /// Rewrites `ipfs://` and `ar://` URIs to their gateway URLs.
    /// Every other URI is returned unchanged.
    pub fn normalize(&self, uri: &str) -> String {
        if let Some(path) = uri.strip_prefix(IPFS_SCHEME) {
            // ipfs://ipfs/<cid> is a common malformed variant
            let path = path.strip_prefix("ipfs/").unwrap_or(path);
            join_gateway(&self.ipfs, path)
        } else if let Some(path) = uri.strip_prefix(ARWEAVE_SCHEME) {
            join_gateway(&self.arweave, path)
        } else {
            uri.to_string()
        }
    }
}

fn join_gateway(gateway: &str, path: &str) -> String {
    format!("{}/{}", gateway.trim_end_matches('/'), path)
}

pub fn is_data_uri(uri: &str) -> bool {
    uri.get(..DATA_SCHEME.len())
        .map(|scheme| scheme.eq_ignore_ascii_case(DATA_SCHEME))
        .unwrap_or(false)
}

/// Decodes `data:<mediatype>[;base64],<data>`.
///
/// Returns `None` when the comma separator is missing or the base64 payload
/// does not decode. Non-base64 payloads are taken as raw text.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    if !is_data_uri(uri) {
        return None;
    }
    let rest = &uri[DATA_SCHEME.len()..];

    let Some((header, data)) = rest.split_once(',') else {
        warn!("Data URI without ',' separator, skipping logo");
        return None;
    };

    let is_base64 = header
        .rsplit(';')
        .next()
        .map(|param| param.trim().eq_ignore_ascii_case("base64"))
        .unwrap_or(false);

    if is_base64 {
        match STANDARD.decode(data.trim()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Failed to decode base64 data URI: {}", e);
                None
            }
        }
    } else {
        Some(data.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateways() -> UriGateways {
        UriGateways::from_config(&AppConfig::default())
    }

    #[test]
    fn content_addressed_uris_use_gateways() {
        let gateways = gateways();
        assert_eq!(gateways.normalize("ipfs://Qm123"), "https://ipfs.io/ipfs/Qm123");
        assert_eq!(gateways.normalize("ipfs://ipfs/Qm123"), "https://ipfs.io/ipfs/Qm123");
        assert_eq!(gateways.normalize("ar://abc"), "https://arweave.net/abc");
    }

    #[test]
    fn other_schemes_are_untouched() {
        let gateways = gateways();
        assert_eq!(
            gateways.normalize("https://example.com/logo.png"),
            "https://example.com/logo.png"
        );
        assert_eq!(gateways.normalize("data:,x"), "data:,x");
    }

    #[test]
    fn decodes_base64_and_raw_payloads() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        assert_eq!(decode_data_uri(&uri), Some(bytes));

        assert_eq!(
            decode_data_uri("data:image/svg+xml,<svg/>"),
            Some(b"<svg/>".to_vec())
        );
        assert_eq!(decode_data_uri("DATA:text/plain,hi"), Some(b"hi".to_vec()));
    }

    #[test]
    fn malformed_data_uris_yield_none() {
        assert!(decode_data_uri("data:image/png;base64").is_none());
        assert!(decode_data_uri("data:image/png;base64,***").is_none());
        assert!(decode_data_uri("https://example.com").is_none());
    }
}
