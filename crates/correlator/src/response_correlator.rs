use std::sync::Arc;

use escalator_core::{
    AppConfig, DispatchInvoker, DispatchRequest, EscalatorError, EscalatorResult, LogBatch,
    ObjectStore, ResponseStatus, RunPointer,
};
use escalator_infrastructure::{CallLogStore, StateStore};
use metrics::counter;
use tracing::{debug, info, instrument, warn};

use crate::classifier::ResponseClassifier;
use crate::event_batch::{correlated_events, decode_delivery};

/// 一次关联处理的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationOutcome {
    pub correlation_id: String,
    pub response_status: ResponseStatus,
    /// 复核后工件的键
    pub reviewed_key: String,
    /// 触发升级时的下一个下标
    pub escalated_to: Option<usize>,
}

impl CorrelationOutcome {
    pub fn summary(&self) -> String {
        format!("应答记录完成: {}", self.reviewed_key)
    }
}

/// 应答关联器
///
/// 每次处理一个事件批次：找到对应的呼叫日志行，写入应答状态，必要时触发下一次发信。
/// 同一批次重复处理会再次更新同一行并再次升级。
pub struct ResponseCorrelator {
    call_logs: CallLogStore,
    state: StateStore,
    invoker: Arc<dyn DispatchInvoker>,
    classifier: ResponseClassifier,
    correlation_index_enabled: bool,
}

impl ResponseCorrelator {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        invoker: Arc<dyn DispatchInvoker>,
        config: &AppConfig,
    ) -> Self {
        Self {
            call_logs: CallLogStore::from_config(store.clone(), config),
            state: StateStore::from_config(store, config),
            invoker,
            classifier: ResponseClassifier::new(&config.correlator),
            correlation_index_enabled: config.correlator.correlation_index_enabled,
        }
    }

    /// 处理原始投递内容（信封或 base64 载荷）
    pub async fn correlate_delivery(&self, input: &[u8]) -> EscalatorResult<CorrelationOutcome> {
        let batch = decode_delivery(input)?;
        self.correlate(&batch).await
    }

    #[instrument(skip_all, fields(events = batch.log_events.len()))]
    pub async fn correlate(&self, batch: &LogBatch) -> EscalatorResult<CorrelationOutcome> {
        let events = correlated_events(batch);
        let correlation_id = events
            .first()
            .and_then(|event| event.correlation_id())
            .ok_or(EscalatorError::NoCorrelationId)?
            .to_string();
        info!("目标关联ID: {}", correlation_id);

        let pointer = self.resolve_run(&correlation_id).await?;

        let mut sheet = self.call_logs.load(&pointer.log_key).await?;
        if sheet.ensure_response_status_column() {
            debug!("呼叫日志缺少应答状态列，已补齐: {}", pointer.log_key);
        }
        let row = sheet
            .find_by_correlation_id(&correlation_id)?
            .ok_or_else(|| EscalatorError::no_matching_row(&correlation_id))?;

        let input = self.classifier.find_input(&events, &correlation_id);
        info!("用户输入: {:?}", input);
        let status = self.classifier.classify(input.as_deref());

        let current = sheet.record(row)?.response_status;
        if !current.can_transition_to(status) {
            return Err(EscalatorError::Internal(format!(
                "不允许的状态变更: {current} -> {status}"
            )));
        }
        if current.is_terminal() {
            warn!("该行已有应答状态，将被覆盖: {} ({})", correlation_id, current);
        }
        sheet.set_response_status(row, status)?;

        counter!("escalator_responses_total", "status" => status.as_str()).increment(1);

        // 升级在写入复核工件之前触发
        let escalated_to = if status.requires_escalation() {
            let next_index = pointer.next_index();
            info!("{}，升级到下一位: index={}", status, next_index);
            self.invoker
                .invoke_async(DispatchRequest::escalate_to(next_index))
                .await?;
            counter!("escalator_escalations_total").increment(1);
            Some(next_index)
        } else {
            info!("对方可以处理，周期结束");
            None
        };

        let reviewed_key = self.call_logs.reviewed_key(&pointer.log_key);
        self.call_logs.save(&reviewed_key, &sheet).await?;

        Ok(CorrelationOutcome {
            correlation_id,
            response_status: status,
            reviewed_key,
            escalated_to,
        })
    }

    /// 优先按关联ID查找运行记录，找不到时退回最新指针
    async fn resolve_run(&self, correlation_id: &str) -> EscalatorResult<RunPointer> {
        if self.correlation_index_enabled {
            if let Some(pointer) = self.state.load_indexed(correlation_id).await? {
                debug!("按关联ID找到运行记录: {}", pointer.log_key);
                return Ok(pointer);
            }
            debug!("没有关联ID索引，使用最新指针");
        }
        self.state.load_latest().await
    }
}
