use std::sync::Arc;

use chrono::NaiveDate;
use escalator_core::{
    config::TelephonyConfig, AppConfig, CallAttemptRecord, CallLogSheet, Candidate, Clock,
    DispatchRequest, EscalatorError, EscalatorResult, ObjectStore, OutboundCallRequest,
    RunPointer, TelephonyGateway,
};
use escalator_infrastructure::{CallLogStore, StateStore};
use metrics::counter;
use tracing::{error, info, instrument};

use crate::roster::RosterReader;

/// 一次发信调用的结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 下标越界：本周期已无人可呼叫，不拨号也不写日志
    CycleComplete { eligible: usize, index: usize },
    /// 已拨号（成功或失败）并持久化日志和指针
    Dialed {
        record: CallAttemptRecord,
        log_key: String,
        contact_index: usize,
    },
}

impl DispatchOutcome {
    pub fn summary(&self) -> String {
        match self {
            DispatchOutcome::CycleComplete { .. } => "全员已呼叫完毕".to_string(),
            DispatchOutcome::Dialed { record, log_key, .. } => {
                format!("{} 发信完成。日志键: {}", record.phone, log_key)
            }
        }
    }
}

/// 选出本次的候选列表和下标
///
/// 开始新周期时只取参考日期当天值班的人，从0开始；升级时使用完整名册。
pub fn eligible_candidates(
    candidates: Vec<Candidate>,
    next_index: Option<usize>,
    reference_date: NaiveDate,
) -> (Vec<Candidate>, usize) {
    match next_index {
        None => (
            candidates
                .into_iter()
                .filter(|c| c.is_scheduled_on(reference_date))
                .collect(),
            0,
        ),
        Some(index) => (candidates, index),
    }
}

/// 呼叫发信器
pub struct CallDispatcher {
    roster: RosterReader,
    gateway: Arc<dyn TelephonyGateway>,
    call_logs: CallLogStore,
    state: StateStore,
    clock: Arc<dyn Clock>,
    telephony: TelephonyConfig,
}

impl CallDispatcher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        gateway: Arc<dyn TelephonyGateway>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        Self {
            roster: RosterReader::new(store.clone(), config.roster.clone()),
            gateway,
            call_logs: CallLogStore::from_config(store.clone(), config),
            state: StateStore::from_config(store, config),
            clock,
            telephony: config.telephony.clone(),
        }
    }

    #[instrument(skip(self))]
    pub async fn dispatch(&self, request: DispatchRequest) -> EscalatorResult<DispatchOutcome> {
        let reference_date = self.clock.today();
        info!("发信开始，参考日期: {}", reference_date);

        let candidates = self.roster.read().await?;
        let (eligible, index) =
            eligible_candidates(candidates, request.next_index, reference_date);
        info!("发信候选数: {} (index={})", eligible.len(), index);

        let Some(candidate) = eligible.get(index) else {
            info!("全员已呼叫完毕，周期结束");
            counter!("escalator_cycles_completed_total").increment(1);
            return Ok(DispatchOutcome::CycleComplete {
                eligible: eligible.len(),
                index,
            });
        };

        let record = self.dial(candidate).await;

        let log_key = self.call_logs.new_log_key(record.dispatched_at);
        let mut sheet = CallLogSheet::new();
        sheet.append(&record);
        self.call_logs.save(&log_key, &sheet).await?;

        let pointer = RunPointer::new(log_key.clone(), index);
        self.state.save_latest(&pointer).await?;
        if let Some(correlation_id) = record.correlation_id.as_deref() {
            self.state.save_indexed(correlation_id, &pointer).await?;
        }

        Ok(DispatchOutcome::Dialed {
            record,
            log_key,
            contact_index: index,
        })
    }

    /// 拨号失败不会中断发信，而是记录为失败的呼叫结果
    async fn dial(&self, candidate: &Candidate) -> CallAttemptRecord {
        let request = OutboundCallRequest {
            caller_id: self.telephony.source_phone_number.clone(),
            destination: candidate.phone.clone(),
            flow_reference: self.telephony.contact_flow_id.clone(),
            attributes: self.telephony.attributes.clone(),
        };
        let dispatched_at = self.clock.now();

        let record = match self.gateway.initiate_call(&request).await {
            Ok(correlation_id) => {
                info!("{} 发信成功: {}", candidate.phone, correlation_id);
                CallAttemptRecord::succeeded(candidate, dispatched_at, correlation_id)
            }
            Err(e) => {
                let detail = match e {
                    EscalatorError::Telephony(detail) => detail,
                    other => other.to_string(),
                };
                error!("{} 发信失败: {}", candidate.phone, detail);
                CallAttemptRecord::failed(candidate, dispatched_at, detail)
            }
        };
        counter!("escalator_dials_total", "outcome" => record.outcome.as_str()).increment(1);
        record
    }
}
