use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 日志投递的外层信封：`{"awslogs": {"data": "<base64(gzip(json))>"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogDeliveryEnvelope {
    pub awslogs: EncodedLogData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedLogData {
    pub data: String,
}

/// 解压后的日志批次
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBatch {
    #[serde(default)]
    pub log_group: Option<String>,
    #[serde(default)]
    pub log_stream: Option<String>,
    #[serde(default)]
    pub log_events: Vec<LogEventEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEventEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// 内容本身是一个 JSON 编码的 [`OutcomeEvent`]
    pub message: String,
}

/// 呼叫流程输出的一条事件记录
///
/// 同时接受电话平台的字段名（`ContactId` 等）和中性字段名（`correlation_id` 等）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    #[serde(rename = "ContactId", alias = "correlation_id", default)]
    pub correlation_id: Option<String>,
    #[serde(rename = "ContactFlowModuleType", alias = "module_type", default)]
    pub module_type: Option<String>,
    /// 平台可能以字符串或数字形式上报按键
    #[serde(rename = "Results", alias = "input_result", default)]
    pub input_result: Option<Value>,
}

impl OutcomeEvent {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref().filter(|id| !id.is_empty())
    }
    pub fn is_module(&self, module_type: &str) -> bool {
        self.module_type.as_deref() == Some(module_type)
    }
    /// 用户输入的按键，统一为去除空白的字符串
    pub fn input_digits(&self) -> Option<String> {
        match self.input_result.as_ref()? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
