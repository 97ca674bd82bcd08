use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use escalator_core::{EscalatorError, EscalatorResult, ObjectStore};
use tracing::debug;

/// 以目录为存储桶的文件系统对象存储
///
/// 对象键按 `/` 映射为子目录；内容类型不落盘。
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> EscalatorResult<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(EscalatorError::storage(format!("无效的对象键: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> EscalatorResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EscalatorError::storage(format!(
                "读取对象 {key} 失败: {e}"
            ))),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> EscalatorResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                EscalatorError::storage(format!("创建目录 {} 失败: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| EscalatorError::storage(format!("写入对象 {key} 失败: {e}")))?;
        debug!(
            "写入对象: {} ({} 字节, {})",
            path.display(),
            body.len(),
            content_type
        );
        Ok(())
    }
}
