//! 应答侧：解码呼叫流程事件批次，回填呼叫日志的应答状态，并决定是否升级

pub mod classifier;
pub mod event_batch;
pub mod response_correlator;

pub use classifier::ResponseClassifier;
pub use event_batch::{correlated_events, decode_delivery, decode_payload, outcome_events};
pub use response_correlator::{CorrelationOutcome, ResponseCorrelator};
