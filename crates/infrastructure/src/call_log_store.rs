use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use escalator_core::{
    AppConfig, CallLogSheet, EscalatorError, EscalatorResult, ObjectStore, CONTENT_TYPE_JSON,
};
use tracing::info;

/// 呼叫日志工件存储
///
/// 每次发信写入一个新键，复核结果写入带后缀的新键，原工件保持不变。
pub struct CallLogStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    extension: String,
    reviewed_suffix: String,
}

impl CallLogStore {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
        reviewed_suffix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_end_matches('/').to_string(),
            extension: extension.into().trim_start_matches('.').to_string(),
            reviewed_suffix: reviewed_suffix.into(),
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &AppConfig) -> Self {
        Self::new(
            store,
            config.storage.prefix.as_str(),
            config.dispatcher.log_extension.as_str(),
            config.correlator.reviewed_suffix.as_str(),
        )
    }

    /// `<prefix>/result_log_<YYYYmmdd_HHMMSS>.<ext>`
    pub fn new_log_key(&self, now: DateTime<FixedOffset>) -> String {
        format!(
            "{}/result_log_{}.{}",
            self.prefix,
            now.format("%Y%m%d_%H%M%S"),
            self.extension
        )
    }

    /// 在扩展名前插入复核后缀；没有扩展名时直接追加
    pub fn reviewed_key(&self, log_key: &str) -> String {
        let dotted = format!(".{}", self.extension);
        match log_key.strip_suffix(&dotted) {
            Some(stem) => format!("{stem}{}{dotted}", self.reviewed_suffix),
            None => format!("{log_key}{}", self.reviewed_suffix),
        }
    }

    pub async fn save(&self, key: &str, sheet: &CallLogSheet) -> EscalatorResult<()> {
        self.store.put(key, sheet.to_bytes()?, CONTENT_TYPE_JSON).await?;
        info!("呼叫日志已保存: {} ({} 行)", key, sheet.len());
        Ok(())
    }

    pub async fn load(&self, key: &str) -> EscalatorResult<CallLogSheet> {
        let body = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| EscalatorError::object_not_found(key))?;
        CallLogSheet::from_bytes(&body)
    }
}
