use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 外呼候选人：名册中的一行经规范化后的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// E.164 格式的电话号码
    pub phone: String,
    /// 值班日期，无法解析时为 None
    pub scheduled_date: Option<NaiveDate>,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        scheduled_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            scheduled_date,
        }
    }
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.scheduled_date == Some(date)
    }
}
