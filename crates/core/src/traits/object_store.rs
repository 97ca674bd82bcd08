use async_trait::async_trait;

use crate::EscalatorResult;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 对象存储抽象接口：按键读写字节
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 读取对象，不存在时返回 `None`
    async fn get(&self, key: &str) -> EscalatorResult<Option<Vec<u8>>>;

    /// 写入对象，已存在时覆盖
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> EscalatorResult<()>;
}
