use chrono::{DateTime, FixedOffset, NaiveDate};

/// 时钟接口，发信器据此决定周期的参考日期和日志键
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// 固定时区下的今天
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
