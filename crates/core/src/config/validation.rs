use crate::{EscalatorError, EscalatorResult};

/// 配置校验接口
pub trait ConfigValidator {
    fn validate(&self) -> EscalatorResult<()>;
}

/// 通用校验工具
pub struct ValidationUtils;

impl ValidationUtils {
    pub fn validate_not_empty(value: &str, field_name: &str) -> EscalatorResult<()> {
        if value.trim().is_empty() {
            return Err(EscalatorError::config_error(format!(
                "{field_name} 不能为空"
            )));
        }
        Ok(())
    }

    pub fn validate_url(url: &str, field_name: &str) -> EscalatorResult<()> {
        Self::validate_not_empty(url, field_name)?;
        if !url.contains("://") {
            return Err(EscalatorError::config_error(format!(
                "{field_name} 必须是带协议的URL: {url}"
            )));
        }
        Ok(())
    }

    pub fn validate_digits(value: &str, field_name: &str) -> EscalatorResult<()> {
        Self::validate_not_empty(value, field_name)?;
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(EscalatorError::config_error(format!(
                "{field_name} 只能包含数字: {value}"
            )));
        }
        Ok(())
    }

    pub fn validate_range(value: i64, min: i64, max: i64, field_name: &str) -> EscalatorResult<()> {
        if value < min || value > max {
            return Err(EscalatorError::config_error(format!(
                "{field_name} 必须在 {min} 到 {max} 之间，当前值: {value}"
            )));
        }
        Ok(())
    }
}
