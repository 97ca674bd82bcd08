use async_trait::async_trait;

use crate::{models::DispatchRequest, EscalatorResult};

/// 异步触发发信器的接口
///
/// 调用即返回，不等待也不确认下一次发信的结果。
#[async_trait]
pub trait DispatchInvoker: Send + Sync {
    async fn invoke_async(&self, request: DispatchRequest) -> EscalatorResult<()>;
}
