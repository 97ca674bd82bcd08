use serde::{Deserialize, Serialize};

use crate::errors::EscalatorError;

/// 发信器的触发负载：`next_index` 缺省表示开始新的周期
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_index: Option<usize>,
}

impl DispatchRequest {
    pub fn start_cycle() -> Self {
        Self { next_index: None }
    }
    pub fn escalate_to(next_index: usize) -> Self {
        Self {
            next_index: Some(next_index),
        }
    }
}

/// 两个入口的返回值：状态码 + 简短消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }
    pub fn failed(error: &EscalatorError) -> Self {
        Self {
            status_code: 500,
            body: format!("错误: {error}"),
        }
    }
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
