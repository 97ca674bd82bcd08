use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::EscalatorError;
use crate::models::Candidate;

/// 发起呼叫的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialOutcome {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
}

impl DialOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialOutcome::Success => "SUCCESS",
            DialOutcome::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for DialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialOutcome {
    type Err = EscalatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(DialOutcome::Success),
            "FAILURE" => Ok(DialOutcome::Failure),
            _ => Err(EscalatorError::CallLogFormat(format!("无效的呼叫结果: {s}"))),
        }
    }
}

/// 被叫方的应答状态
///
/// ```text
/// Pending → AnsweredAvailable    (终态，不再升级)
///         → AnsweredUnavailable  (终态，升级到下一位)
///         → NoAnswer             (终态，升级到下一位)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ANSWERED_AVAILABLE")]
    AnsweredAvailable,
    #[serde(rename = "ANSWERED_UNAVAILABLE")]
    AnsweredUnavailable,
    #[serde(rename = "NO_ANSWER")]
    NoAnswer,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "PENDING",
            ResponseStatus::AnsweredAvailable => "ANSWERED_AVAILABLE",
            ResponseStatus::AnsweredUnavailable => "ANSWERED_UNAVAILABLE",
            ResponseStatus::NoAnswer => "NO_ANSWER",
        }
    }
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResponseStatus::Pending)
    }
    /// 是否需要呼叫下一位候选人
    pub fn requires_escalation(&self) -> bool {
        matches!(
            self,
            ResponseStatus::AnsweredUnavailable | ResponseStatus::NoAnswer
        )
    }
    /// 任何状态都不能回到 Pending；终态之间的重复写入被允许（无去重）
    pub fn can_transition_to(&self, to: ResponseStatus) -> bool {
        to.is_terminal()
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = EscalatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" | "" => Ok(ResponseStatus::Pending),
            "ANSWERED_AVAILABLE" => Ok(ResponseStatus::AnsweredAvailable),
            "ANSWERED_UNAVAILABLE" => Ok(ResponseStatus::AnsweredUnavailable),
            "NO_ANSWER" => Ok(ResponseStatus::NoAnswer),
            _ => Err(EscalatorError::CallLogFormat(format!("无效的应答状态: {s}"))),
        }
    }
}

/// 一次呼叫尝试的记录，对应呼叫日志中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAttemptRecord {
    pub name: String,
    pub phone: String,
    pub dispatched_at: DateTime<FixedOffset>,
    pub outcome: DialOutcome,
    pub failure_detail: Option<String>,
    pub correlation_id: Option<String>,
    pub response_status: ResponseStatus,
}

impl CallAttemptRecord {
    pub fn succeeded(
        candidate: &Candidate,
        dispatched_at: DateTime<FixedOffset>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            name: candidate.name.clone(),
            phone: candidate.phone.clone(),
            dispatched_at,
            outcome: DialOutcome::Success,
            failure_detail: None,
            correlation_id: Some(correlation_id.into()),
            response_status: ResponseStatus::Pending,
        }
    }
    pub fn failed(
        candidate: &Candidate,
        dispatched_at: DateTime<FixedOffset>,
        failure_detail: impl Into<String>,
    ) -> Self {
        Self {
            name: candidate.name.clone(),
            phone: candidate.phone.clone(),
            dispatched_at,
            outcome: DialOutcome::Failure,
            failure_detail: Some(failure_detail.into()),
            correlation_id: None,
            response_status: ResponseStatus::Pending,
        }
    }
    pub fn is_success(&self) -> bool {
        self.outcome == DialOutcome::Success
    }
}
