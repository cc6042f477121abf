use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tokio::sync::Mutex as AsyncMutex;

use crate::entity::{
    is_valid_identifier, token_ids_match, AssetError, AssetRecord, AssetResult,
    TokenListDocument,
};

/// What an upsert did to the token list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Repository of per-chain token lists
#[async_trait]
pub trait TokenListRepository: Send + Sync {
    /// Loads the chain's assets; `None` when the chain has no list yet
    async fn load(&self, chain: &str) -> AssetResult<Option<Vec<AssetRecord>>>;

    /// Inserts the sanitized asset or merges it into the existing record
    async fn upsert(&self, chain: &str, asset: &AssetRecord) -> AssetResult<UpsertOutcome>;
}

/// Token lists stored as pretty-printed JSON files, one per chain
pub struct FileTokenListRepository {
    lists_dir: PathBuf,
    chain_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FileTokenListRepository {
    pub fn new(lists_dir: impl Into<PathBuf>) -> Self {
        Self {
            lists_dir: lists_dir.into(),
            chain_locks: Mutex::new(HashMap::new()),
        }
    }

    fn document_path(&self, chain: &str) -> AssetResult<PathBuf> {
        if !is_valid_identifier(chain) {
            return Err(AssetError::InvalidIdentifier(chain.to_string()));
        }
        Ok(self.lists_dir.join(format!("{}.json", chain)))
    }

    // Upserts on one chain are serialized so concurrent read-modify-write
    // sequences cannot drop each other's records.
    fn chain_lock(&self, chain: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .chain_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(chain.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn read_document(path: &Path) -> AssetResult<Option<TokenListDocument>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| AssetError::TokenListParse {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn write_document(path: &Path, document: &TokenListDocument) -> AssetResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut contents = serde_json::to_string_pretty(document)?;
        contents.push('\n');

        // Write next to the target and rename so readers never see a partial file
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, path).await?;

        Ok(())
    }
}

#[async_trait]
impl TokenListRepository for FileTokenListRepository {
    async fn load(&self, chain: &str) -> AssetResult<Option<Vec<AssetRecord>>> {
        let path = self.document_path(chain)?;
        let document = Self::read_document(&path).await?;

        if document.is_none() {
            debug!("No token list for chain {} at {}", chain, path.display());
        }

        Ok(document.map(|doc| doc.assets))
    }

    async fn upsert(&self, chain: &str, asset: &AssetRecord) -> AssetResult<UpsertOutcome> {
        let path = self.document_path(chain)?;
        let lock = self.chain_lock(chain);
        let _guard = lock.lock().await;

        let mut document = Self::read_document(&path).await?.unwrap_or_default();
        let sanitized = asset.sanitized();

        let existing = document
            .assets
            .iter_mut()
            .find(|record| token_ids_match(chain, &record.token_id, &sanitized.token_id));

        let outcome = match existing {
            Some(record) => {
                if !record.merge_from(&sanitized) {
                    debug!("Token list {} already up to date for {}", chain, sanitized.token_id);
                    return Ok(UpsertOutcome::Unchanged);
                }
                UpsertOutcome::Updated
            }
            None => {
                document.assets.push(sanitized);
                UpsertOutcome::Inserted
            }
        };

        Self::write_document(&path, &document).await?;
        info!(
            "Token list {} {:?} asset {}",
            chain,
            outcome,
            asset.token_id
        );

        Ok(outcome)
    }
}
