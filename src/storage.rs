use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()>;
    async fn get_object(&self, key: &str) -> anyhow::Result<Bytes>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
}

/// Photo store rooted at a single directory on local disk.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create upload directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// Only plain relative segments are allowed, so a key can never leave `root`.
    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(key);
        let plain = rel.components().all(|c| matches!(c, Component::Normal(_)));
        anyhow::ensure!(plain && !key.is_empty(), "invalid storage key {key:?}");
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> anyhow::Result<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        Ok(Bytes::from(data))
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.resolve(key)?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("remove {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_get_delete() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).unwrap();

        storage
            .put_object("7/abc-front.jpg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();
        assert!(dir.path().join("7").join("abc-front.jpg").exists());

        let back = storage.get_object("7/abc-front.jpg").await.unwrap();
        assert_eq!(&back[..], b"jpeg bytes");

        storage.delete_object("7/abc-front.jpg").await.unwrap();
        assert!(storage.get_object("7/abc-front.jpg").await.is_err());
    }

    #[tokio::test]
    async fn rejects_keys_that_escape_the_root() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads")).unwrap();

        for key in ["../outside.jpg", "/etc/passwd", "1/../../x.jpg", ""] {
            let res = storage.put_object(key, Bytes::from_static(b"x")).await;
            assert!(res.is_err(), "key {key:?} should be rejected");
        }
        assert!(!dir.path().join("outside.jpg").exists());
    }
}
