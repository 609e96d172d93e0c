use std::path::{Path, PathBuf};

use tracing::debug;

use super::{BlobStore, is_safe_key};
use crate::errors::{PortalError, Result};

/// 本地目录实现，每个 key 对应目录下的一个文件
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// 目录不存在时创建
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            PortalError::blob_storage(format!(
                "Failed to create blob directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_safe_key(key) {
            return Err(PortalError::blob_storage(format!("Invalid storage key: {key}")));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| PortalError::blob_storage(format!("Failed to write {key}: {e}")))?;
        debug!("Stored blob {} ({} bytes)", key, data.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortalError::blob_storage(format!("Failed to read {key}: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::blob_storage(format!(
                "Failed to delete {key}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("blobs")).await.unwrap();

        store.put("a.pdf", b"%PDF-1.7").await.unwrap();
        assert_eq!(store.get("a.pdf").await.unwrap().as_deref(), Some(&b"%PDF-1.7"[..]));

        store.delete("a.pdf").await.unwrap();
        assert!(store.get("a.pdf").await.unwrap().is_none());
        // 重复删除不报错
        store.delete("a.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        assert!(store.put("../escape.txt", b"x").await.is_err());
    }
}
