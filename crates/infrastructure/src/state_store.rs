use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use escalator_core::{
    AppConfig, EscalatorError, EscalatorResult, ObjectStore, RunPointer, CONTENT_TYPE_JSON,
};
use tracing::{debug, info};

const POINTER_FILE: &str = "latest_log_key.json";
const RUN_INDEX_DIR: &str = "runs";

/// 运行指针存储
///
/// - `<prefix>/latest_log_key.json`：最新指针，每次发信覆盖
/// - `<prefix>/runs/<base64url(correlation_id)>.json`：按关联ID索引的同一指针，只写一次
pub struct StateStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl StateStore {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &AppConfig) -> Self {
        Self::new(store, config.storage.prefix.as_str())
    }

    pub fn pointer_key(&self) -> String {
        format!("{}/{}", self.prefix, POINTER_FILE)
    }

    /// 关联ID经 URL 安全的 base64 编码后作为文件名，不同ID不会映射到同一个键
    pub fn run_index_key(&self, correlation_id: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.prefix,
            RUN_INDEX_DIR,
            URL_SAFE_NO_PAD.encode(correlation_id)
        )
    }

    pub async fn save_latest(&self, pointer: &RunPointer) -> EscalatorResult<()> {
        let key = self.pointer_key();
        self.store
            .put(&key, serde_json::to_vec(pointer)?, CONTENT_TYPE_JSON)
            .await?;
        info!(
            "最新指针已更新: {} -> {} (index={})",
            key, pointer.log_key, pointer.contact_index
        );
        Ok(())
    }

    /// 读取最新指针，不存在时返回 `PointerNotFound`
    pub async fn load_latest(&self) -> EscalatorResult<RunPointer> {
        let key = self.pointer_key();
        let body = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| EscalatorError::pointer_not_found(&key))?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn save_indexed(&self, correlation_id: &str, pointer: &RunPointer) -> EscalatorResult<()> {
        let key = self.run_index_key(correlation_id);
        self.store
            .put(&key, serde_json::to_vec(pointer)?, CONTENT_TYPE_JSON)
            .await?;
        debug!("运行记录已按关联ID索引: {}", key);
        Ok(())
    }

    pub async fn load_indexed(&self, correlation_id: &str) -> EscalatorResult<Option<RunPointer>> {
        match self.store.get(&self.run_index_key(correlation_id)).await? {
            Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryObjectStore;

    fn state_store() -> (StateStore, InMemoryObjectStore) {
        let objects = InMemoryObjectStore::new();
        (
            StateStore::new(Arc::new(objects.clone()), "connect-call-log/"),
            objects,
        )
    }

    #[tokio::test]
    async fn test_latest_pointer_is_overwritten() {
        let (state, objects) = state_store();
        assert!(matches!(
            state.load_latest().await,
            Err(EscalatorError::PointerNotFound { .. })
        ));

        state.save_latest(&RunPointer::new("connect-call-log/a.json", 0)).await.unwrap();
        state.save_latest(&RunPointer::new("connect-call-log/b.json", 1)).await.unwrap();

        let latest = state.load_latest().await.unwrap();
        assert_eq!(latest, RunPointer::new("connect-call-log/b.json", 1));
        assert_eq!(objects.keys().await, vec!["connect-call-log/latest_log_key.json"]);
        assert_eq!(
            objects.object(&state.pointer_key()).await.unwrap().content_type,
            CONTENT_TYPE_JSON
        );
    }

    #[tokio::test]
    async fn test_indexed_pointers_are_independent() {
        let (state, _) = state_store();
        state.save_indexed("c-1", &RunPointer::new("connect-call-log/a.json", 0)).await.unwrap();
        state.save_indexed("c-2", &RunPointer::new("connect-call-log/b.json", 1)).await.unwrap();

        assert_eq!(
            state.load_indexed("c-1").await.unwrap(),
            Some(RunPointer::new("connect-call-log/a.json", 0))
        );
        assert_eq!(state.load_indexed("c-3").await.unwrap(), None);
    }

    #[test]
    fn test_index_keys_do_not_collide() {
        let (state, _) = state_store();
        assert_eq!(state.run_index_key("c-1"), "connect-call-log/runs/Yy0x.json");
        assert_ne!(state.run_index_key("a/b"), state.run_index_key("a_b"));
        assert_eq!(
            state.run_index_key("abc/../d e"),
            "connect-call-log/runs/YWJjLy4uL2QgZQ.json"
        );
    }

    #[tokio::test]
    async fn test_similar_ids_keep_separate_runs() {
        let (state, _) = state_store();
        state.save_indexed("a/b", &RunPointer::new("connect-call-log/a.json", 0)).await.unwrap();
        state.save_indexed("a_b", &RunPointer::new("connect-call-log/b.json", 1)).await.unwrap();

        assert_eq!(
            state.load_indexed("a/b").await.unwrap(),
            Some(RunPointer::new("connect-call-log/a.json", 0))
        );
        assert_eq!(
            state.load_indexed("a_b").await.unwrap(),
            Some(RunPointer::new("connect-call-log/b.json", 1))
        );
    }
}
