use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, ensure};
use async_trait::async_trait;

/// 渲染目标，每次写入都会完整替换原有内容
#[async_trait]
pub trait RenderTarget: Send + Sync {
    /// 检查目标是否可用，在发起任何请求之前调用
    fn check(&self) -> Result<()>;

    async fn replace(&self, html: &str) -> Result<()>;
}

pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_owned() }
    }

    /// 每次写入使用不同的临时文件，并发写入时互不覆盖
    fn tmp_path(&self) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        self.path.with_extension(format!(
            "html.{}.{}.tmp",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ))
    }

    fn parent(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[async_trait]
impl RenderTarget for FileTarget {
    fn check(&self) -> Result<()> {
        ensure!(
            self.path.file_name().is_some(),
            "render target {} is not a file path",
            self.path.display()
        );
        ensure!(
            self.parent().is_dir(),
            "directory of render target {} does not exist",
            self.path.display()
        );
        Ok(())
    }

    async fn replace(&self, html: &str) -> Result<()> {
        // 先写临时文件再重命名，避免读取方看到写了一半的内容
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, html)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to replace {}", self.path.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryTarget;
