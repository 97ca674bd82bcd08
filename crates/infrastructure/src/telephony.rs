use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use escalator_core::{
    config::TelephonyConfig, EscalatorError, EscalatorResult, OutboundCallRequest,
    TelephonyGateway,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StartOutboundContactBody<'a> {
    instance_id: &'a str,
    contact_flow_id: &'a str,
    source_phone_number: &'a str,
    destination_phone_number: &'a str,
    attributes: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StartOutboundContactReply {
    contact_id: String,
}

/// 通过 HTTP 调用外呼服务的电话网关
pub struct HttpTelephonyGateway {
    client: reqwest::Client,
    endpoint: String,
    instance_id: String,
}

impl HttpTelephonyGateway {
    pub fn new(config: &TelephonyConfig) -> EscalatorResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| EscalatorError::config_error(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            instance_id: config.instance_id.clone(),
        })
    }
}

#[async_trait]
impl TelephonyGateway for HttpTelephonyGateway {
    async fn initiate_call(&self, request: &OutboundCallRequest) -> EscalatorResult<String> {
        let body = StartOutboundContactBody {
            instance_id: &self.instance_id,
            contact_flow_id: &request.flow_reference,
            source_phone_number: &request.caller_id,
            destination_phone_number: &request.destination,
            attributes: &request.attributes,
        };
        debug!("发起外呼请求: {} -> {}", self.endpoint, request.destination);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| EscalatorError::Telephony(format!("外呼请求发送失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("外呼服务返回错误状态: {} {}", status, text);
            return Err(EscalatorError::Telephony(format!(
                "外呼服务返回 {status}: {text}"
            )));
        }

        let reply: StartOutboundContactReply = response
            .json()
            .await
            .map_err(|e| EscalatorError::Telephony(format!("外呼响应解析失败: {e}")))?;
        if reply.contact_id.is_empty() {
            return Err(EscalatorError::Telephony("外呼响应缺少ContactId".to_string()));
        }
        Ok(reply.contact_id)
    }
}

/// 不实际拨号的网关，返回随机关联ID
#[derive(Debug, Default, Clone)]
pub struct DryRunTelephonyGateway;

#[async_trait]
impl TelephonyGateway for DryRunTelephonyGateway {
    async fn initiate_call(&self, request: &OutboundCallRequest) -> EscalatorResult<String> {
        let contact_id = uuid::Uuid::new_v4().to_string();
        info!(
            "[dry-run] 模拟外呼: {} -> {} (ContactId={})",
            request.caller_id, request.destination, contact_id
        );
        Ok(contact_id)
    }
}
