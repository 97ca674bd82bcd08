use chrono::{DateTime, FixedOffset, Utc};
use escalator_core::{Clock, EscalatorError, EscalatorResult};

/// 固定时区偏移的系统时钟
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn with_offset_hours(hours: i32) -> EscalatorResult<Self> {
        let offset = FixedOffset::east_opt(hours * 3600)
            .ok_or_else(|| EscalatorError::config_error(format!("无效的时区偏移: {hours}")))?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}
