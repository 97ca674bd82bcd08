//! Mock implementations of the collaborator traits
//!
//! These doubles record every interaction so tests can assert on what the
//! dispatcher and correlator asked of the outside world.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use escalator_core::{
    Clock, DispatchInvoker, DispatchRequest, EscalatorError, EscalatorResult,
    OutboundCallRequest, TelephonyGateway,
};
use std::sync::{Arc, Mutex};

/// Mock telephony gateway that either hands out sequential contact ids or
/// fails every call with a fixed detail.
#[derive(Debug, Clone, Default)]
pub struct MockTelephonyGateway {
    calls: Arc<Mutex<Vec<OutboundCallRequest>>>,
    failure: Option<String>,
}

impl MockTelephonyGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failure: Some(detail.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<OutboundCallRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TelephonyGateway for MockTelephonyGateway {
    async fn initiate_call(&self, request: &OutboundCallRequest) -> EscalatorResult<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request.clone());
        match &self.failure {
            Some(detail) => Err(EscalatorError::Telephony(detail.clone())),
            None => Ok(format!("contact-{}", calls.len())),
        }
    }
}

/// Invoker that records requests instead of starting a dispatcher
#[derive(Debug, Clone, Default)]
pub struct RecordingInvoker {
    requests: Arc<Mutex<Vec<DispatchRequest>>>,
    fail: bool,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DispatchInvoker for RecordingInvoker {
    async fn invoke_async(&self, request: DispatchRequest) -> EscalatorResult<()> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(EscalatorError::Invocation("mock invoker failure".to_string()));
        }
        Ok(())
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// `FixedClock::at(2026, 10, 18, 9, 0, 0, 9)` is 09:00 in UTC+9
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32, offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        Self::new(
            offset
                .with_ymd_and_hms(year, month, day, hour, min, sec)
                .unwrap(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}
