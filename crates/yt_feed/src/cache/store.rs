use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// 字符串键值存储，缓存的持久化由它负责
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// 每个 key 对应目录下的一个文件，文件名为 key 的 md5
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{:x}.json", md5::compute(key)))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_of(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_of(key);
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_of(key);
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("failed to remove {}", path.display()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::KvStore;

    /// 内存中的存储，可以模拟写入失败（例如配额已满）
    #[derive(Default)]
    pub struct MemoryStore {
        inner: Mutex<HashMap<String, String>>,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.inner.lock().get(key).cloned()
        }

        pub fn insert_raw(&self, key: &str, value: &str) {
            self.inner.lock().insert(key.to_owned(), value.to_owned());
        }
    }

    #[async_trait]
    impl KvStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.inner.lock().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                bail!("quota exceeded");
            }
            self.inner.lock().insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.lock().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("yt-feed-store-{}", std::process::id()));
        let store = FileStore::new(dir.clone());
        assert_eq!(store.get("yt_feed_rustlang").await.unwrap(), None);
        store.set("yt_feed_rustlang", "{}").await.unwrap();
        assert_eq!(store.get("yt_feed_rustlang").await.unwrap().as_deref(), Some("{}"));
        assert!(
            store
                .path_of("yt_feed_rustlang")
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(".json")
        );
        store.remove("yt_feed_rustlang").await.unwrap();
        store.remove("yt_feed_rustlang").await.unwrap();
        assert_eq!(store.get("yt_feed_rustlang").await.unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }
}
