//! 日志订阅批次解码：base64 → gzip → JSON

use std::io::Read;

use base64::{engine::general_purpose, Engine as _};
use escalator_core::{
    EscalatorError, EscalatorResult, LogBatch, LogDeliveryEnvelope, OutcomeEvent,
};
use flate2::read::GzDecoder;
use tracing::debug;

fn malformed(msg: impl std::fmt::Display) -> EscalatorError {
    EscalatorError::MalformedBatch(msg.to_string())
}

/// 解码 `awslogs.data` 中的载荷
pub fn decode_payload(data: &str) -> EscalatorResult<LogBatch> {
    let compressed = general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| malformed(format!("base64解码失败: {e}")))?;

    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| malformed(format!("解压失败: {e}")))?;

    serde_json::from_str(&json).map_err(|e| malformed(format!("批次JSON解析失败: {e}")))
}

/// 解码投递内容：信封 JSON 或直接的 base64 载荷
pub fn decode_delivery(input: &[u8]) -> EscalatorResult<LogBatch> {
    if let Ok(envelope) = serde_json::from_slice::<LogDeliveryEnvelope>(input) {
        return decode_payload(&envelope.awslogs.data);
    }
    let text = std::str::from_utf8(input).map_err(|e| malformed(format!("输入不是UTF-8: {e}")))?;
    decode_payload(text)
}

/// 把批次中的消息解析为事件，非 JSON 消息跳过
pub fn outcome_events(batch: &LogBatch) -> Vec<OutcomeEvent> {
    batch
        .log_events
        .iter()
        .filter_map(|entry| match serde_json::from_str::<OutcomeEvent>(&entry.message) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("跳过非事件消息 {:?}: {}", entry.id, e);
                None
            }
        })
        .collect()
}

/// 只保留带关联ID的事件
pub fn correlated_events(batch: &LogBatch) -> Vec<OutcomeEvent> {
    outcome_events(batch)
        .into_iter()
        .filter(|event| event.correlation_id().is_some())
        .collect()
}
