use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use escalator_core::{EscalatorResult, ObjectStore};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// 内存对象存储实现
///
/// 适用于测试和单进程试运行，进程退出后数据丢失。
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> EscalatorResult<Option<Vec<u8>>> {
        Ok(self.objects.read().await.get(key).map(|o| o.body.clone()))
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> EscalatorResult<()> {
        debug!("写入内存对象: {} ({} 字节)", key, body.len());
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
