use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::EscalatorResult;

/// 外呼请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCallRequest {
    /// 主叫号码
    pub caller_id: String,
    /// 被叫号码（E.164）
    pub destination: String,
    /// 联系流程ID
    pub flow_reference: String,
    /// 随呼叫传递的自定义属性
    pub attributes: BTreeMap<String, String>,
}

/// 电话网关抽象接口
#[async_trait]
pub trait TelephonyGateway: Send + Sync {
    /// 发起外呼，成功时返回关联ID
    ///
    /// 失败以 `EscalatorError::Telephony` 返回，发信器会把它记录为失败的呼叫结果。
    async fn initiate_call(&self, request: &OutboundCallRequest) -> EscalatorResult<String>;
}
