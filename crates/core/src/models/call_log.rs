use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{EscalatorError, EscalatorResult};
use crate::models::{CallAttemptRecord, ResponseStatus};

pub const COLUMN_NAME: &str = "name";
pub const COLUMN_PHONE: &str = "phone";
pub const COLUMN_DISPATCHED_AT: &str = "dispatched_at";
pub const COLUMN_OUTCOME: &str = "outcome";
pub const COLUMN_FAILURE_DETAIL: &str = "failure_detail";
pub const COLUMN_CORRELATION_ID: &str = "correlation_id";
pub const COLUMN_RESPONSE_STATUS: &str = "response_status";

/// 呼叫日志工作表标题
pub const CALL_LOG_TITLE: &str = "发信日志";

/// 呼叫日志工件：每次发起呼叫生成一个新的表格，写入后不再原地修改
///
/// 以表头 + 字符串单元格的形式保存，旧版工件可能缺少应答状态列，
/// 由 [`CallLogSheet::ensure_response_status_column`] 补齐。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogSheet {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for CallLogSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLogSheet {
    pub fn new() -> Self {
        Self {
            title: CALL_LOG_TITLE.to_string(),
            header: [
                COLUMN_NAME,
                COLUMN_PHONE,
                COLUMN_DISPATCHED_AT,
                COLUMN_OUTCOME,
                COLUMN_FAILURE_DETAIL,
                COLUMN_CORRELATION_ID,
                COLUMN_RESPONSE_STATUS,
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> EscalatorResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| EscalatorError::CallLogFormat(format!("无法解析呼叫日志: {e}")))
    }

    pub fn to_bytes(&self) -> EscalatorResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h == column)
    }

    fn require_column(&self, column: &str) -> EscalatorResult<usize> {
        self.column_index(column)
            .ok_or_else(|| EscalatorError::CallLogFormat(format!("缺少列: {column}")))
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 按表头顺序追加一条记录
    pub fn append(&mut self, record: &CallAttemptRecord) {
        let row = self
            .header
            .iter()
            .map(|column| match column.as_str() {
                COLUMN_NAME => record.name.clone(),
                COLUMN_PHONE => record.phone.clone(),
                COLUMN_DISPATCHED_AT => record.dispatched_at.to_rfc3339(),
                COLUMN_OUTCOME => record.outcome.to_string(),
                COLUMN_FAILURE_DETAIL => record.failure_detail.clone().unwrap_or_default(),
                COLUMN_CORRELATION_ID => record.correlation_id.clone().unwrap_or_default(),
                COLUMN_RESPONSE_STATUS => record.response_status.to_string(),
                _ => String::new(),
            })
            .collect();
        self.rows.push(row);
    }

    /// 若缺少应答状态列则追加该列，已有行补为 Pending。返回是否发生了变更
    pub fn ensure_response_status_column(&mut self) -> bool {
        if self.column_index(COLUMN_RESPONSE_STATUS).is_some() {
            return false;
        }
        let width = self.header.len();
        self.header.push(COLUMN_RESPONSE_STATUS.to_string());
        for row in &mut self.rows {
            row.resize(width, String::new());
            row.push(ResponseStatus::Pending.to_string());
        }
        true
    }

    /// 查找关联ID匹配的第一行
    pub fn find_by_correlation_id(&self, correlation_id: &str) -> EscalatorResult<Option<usize>> {
        let column = self.require_column(COLUMN_CORRELATION_ID)?;
        Ok((0..self.rows.len()).find(|&row| {
            let value = self.cell(row, column);
            !value.is_empty() && value == correlation_id
        }))
    }

    pub fn set_response_status(&mut self, row: usize, status: ResponseStatus) -> EscalatorResult<()> {
        let column = self.require_column(COLUMN_RESPONSE_STATUS)?;
        let width = self.header.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or_else(|| EscalatorError::CallLogFormat(format!("行不存在: {row}")))?;
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        cells[column] = status.to_string();
        Ok(())
    }

    pub fn record(&self, row: usize) -> EscalatorResult<CallAttemptRecord> {
        if row >= self.rows.len() {
            return Err(EscalatorError::CallLogFormat(format!("行不存在: {row}")));
        }
        let text = |column: &str| -> EscalatorResult<String> {
            Ok(self.cell(row, self.require_column(column)?).to_string())
        };
        let optional = |value: String| (!value.is_empty()).then_some(value);

        let dispatched_at = DateTime::parse_from_rfc3339(&text(COLUMN_DISPATCHED_AT)?)
            .map_err(|e| EscalatorError::CallLogFormat(format!("无效的发信时间: {e}")))?;
        let response_status = match self.column_index(COLUMN_RESPONSE_STATUS) {
            Some(column) => self.cell(row, column).parse()?,
            None => ResponseStatus::Pending,
        };

        Ok(CallAttemptRecord {
            name: text(COLUMN_NAME)?,
            phone: text(COLUMN_PHONE)?,
            dispatched_at,
            outcome: text(COLUMN_OUTCOME)?.parse()?,
            failure_detail: optional(text(COLUMN_FAILURE_DETAIL)?),
            correlation_id: optional(text(COLUMN_CORRELATION_ID)?),
            response_status,
        })
    }

    pub fn records(&self) -> EscalatorResult<Vec<CallAttemptRecord>> {
        (0..self.rows.len()).map(|row| self.record(row)).collect()
    }
}
