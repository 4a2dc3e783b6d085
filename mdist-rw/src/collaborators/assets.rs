//! Content-addressed asset storage on local disk

use async_trait::async_trait;
use mdist_common::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{AssetKind, AssetRef, AssetStore};

/// Stores uploads as `<root>/<kind>/<sha256>.bin`
///
/// Identical uploads map to the same file and URL.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Disk location for an asset URL issued by this store
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix("asset://")?;
        let (kind, digest) = rest.split_once('/')?;
        let kind: AssetKind = kind.parse().ok()?;
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(self.root.join(kind.as_str()).join(format!("{}.bin", digest)))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload_asset(&self, bytes: &[u8], kind: AssetKind) -> Result<AssetRef> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Empty upload".to_string()));
        }

        let sha256 = format!("{:x}", Sha256::digest(bytes));
        let dir = self.root.join(kind.as_str());
        let path = dir.join(format!("{}.bin", sha256));

        if tokio::fs::try_exists(&path).await? {
            debug!(kind = %kind, sha256 = %sha256, "Asset already stored");
        } else {
            tokio::fs::create_dir_all(&dir).await?;
            // Write under a temporary name so a partial file is never visible
            let partial = dir.join(format!("{}.part", sha256));
            tokio::fs::write(&partial, bytes).await?;
            tokio::fs::rename(&partial, &path).await?;
            info!(kind = %kind, sha256 = %sha256, size = bytes.len(), "Stored asset");
        }

        Ok(AssetRef {
            kind,
            url: format!("asset://{}/{}", kind, sha256),
            size_bytes: bytes.len() as u64,
            sha256,
        })
    }
}
