//! Test data builders
//!
//! Builders produce rosters, candidates and outcome event batches in the
//! exact shape the production code reads them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use escalator_core::Candidate;
use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value};
use std::io::Write;

/// Builder for Candidate values
pub struct CandidateBuilder {
    candidate: Candidate,
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self {
            candidate: Candidate::new("山田太郎", "+819012345678", None),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.candidate.name = name.to_string();
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.candidate.phone = phone.to_string();
        self
    }

    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.candidate.scheduled_date = Some(date);
        self
    }

    pub fn build(self) -> Candidate {
        self.candidate
    }
}

impl Default for CandidateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const ROSTER_WIDTH: usize = 9;

/// Builder for roster workbooks laid out with name in column 0, date in
/// column 3 and phone in column 8.
pub struct RosterBuilder {
    sheet: String,
    rows: Vec<Vec<Value>>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        let mut header = vec![Value::String(String::new()); ROSTER_WIDTH];
        header[0] = json!("名前");
        header[3] = json!("日付");
        header[8] = json!("電話番号");
        Self {
            sheet: "シフト".to_string(),
            rows: vec![header],
        }
    }

    pub fn with_sheet(mut self, sheet: &str) -> Self {
        self.sheet = sheet.to_string();
        self
    }

    /// Adds a row with name, date cell and phone cell
    pub fn with_row(self, name: &str, date: impl Into<Value>, phone: impl Into<Value>) -> Self {
        self.with_cells(json!(name), date.into(), phone.into())
    }

    pub fn with_cells(mut self, name: Value, date: Value, phone: Value) -> Self {
        let mut row = vec![Value::String(String::new()); ROSTER_WIDTH];
        row[0] = name;
        row[3] = date;
        row[8] = phone;
        self.rows.push(row);
        self
    }

    pub fn with_raw_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn build_json(&self) -> Value {
        let mut sheets = serde_json::Map::new();
        sheets.insert(self.sheet.clone(), json!(self.rows));
        json!({ "sheets": sheets })
    }

    pub fn build_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build_json()).unwrap()
    }
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for compressed outcome event batches as delivered by the log
/// subscription: `{"awslogs": {"data": base64(gzip(batch))}}`.
pub struct EventBatchBuilder {
    messages: Vec<String>,
}

impl EventBatchBuilder {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: Value) -> Self {
        self.messages.push(event.to_string());
        self
    }

    /// A flow event without user input
    pub fn with_flow_event(self, contact_id: &str, module_type: &str) -> Self {
        self.with_event(json!({
            "ContactId": contact_id,
            "ContactFlowModuleType": module_type,
        }))
    }

    /// A `GetUserInput` event carrying the pressed digit
    pub fn with_ivr_input(self, contact_id: &str, digit: &str) -> Self {
        self.with_event(json!({
            "ContactId": contact_id,
            "ContactFlowModuleType": "GetUserInput",
            "Results": digit,
        }))
    }

    pub fn with_raw_message(mut self, message: &str) -> Self {
        self.messages.push(message.to_string());
        self
    }

    pub fn build_batch(&self) -> Value {
        let events: Vec<Value> = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                json!({
                    "id": i.to_string(),
                    "timestamp": 1_760_000_000_000i64 + i as i64,
                    "message": message,
                })
            })
            .collect();
        json!({
            "messageType": "DATA_MESSAGE",
            "logGroup": "/aws/connect/escalator",
            "logStream": "stream",
            "logEvents": events,
        })
    }

    /// base64(gzip(batch json))
    pub fn build_payload(&self) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(self.build_batch().to_string().as_bytes())
            .unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    pub fn build_envelope(&self) -> Vec<u8> {
        serde_json::to_vec(&json!({ "awslogs": { "data": self.build_payload() } })).unwrap()
    }
}

impl Default for EventBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
