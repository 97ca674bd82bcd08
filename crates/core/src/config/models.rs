use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::validation::{ConfigValidator, ValidationUtils};
use crate::{EscalatorError, EscalatorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Filesystem,
    Memory,
}

/// 对象存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// 文件系统后端的根目录（相当于存储桶）
    pub root: String,
    /// 呼叫日志与指针的键前缀
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            root: "data/amazon-connect-list".to_string(),
            prefix: "connect-call-log".to_string(),
        }
    }
}

impl ConfigValidator for StorageConfig {
    fn validate(&self) -> EscalatorResult<()> {
        if self.backend == StorageBackend::Filesystem {
            ValidationUtils::validate_not_empty(&self.root, "storage.root")?;
        }
        ValidationUtils::validate_not_empty(&self.prefix, "storage.prefix")?;
        Ok(())
    }
}

/// 名册配置，列号从0开始
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub key: String,
    pub sheet: String,
    pub name_column: usize,
    pub date_column: usize,
    pub phone_column: usize,
    /// 国内长途前缀
    pub trunk_prefix: String,
    /// 国家代码，替换长途前缀
    pub country_code: String,
    pub min_digits: usize,
    /// 姓名缺失时的占位
    pub unknown_name: String,
    /// 依次尝试的日期格式
    pub date_formats: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            key: "シフト表.json".to_string(),
            sheet: "シフト".to_string(),
            name_column: 0,
            date_column: 3,
            phone_column: 8,
            trunk_prefix: "0".to_string(),
            country_code: "+81".to_string(),
            min_digits: 10,
            unknown_name: "不明".to_string(),
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%m/%d/%y".to_string(),
                "%Y/%m/%d".to_string(),
            ],
        }
    }
}

impl ConfigValidator for RosterConfig {
    fn validate(&self) -> EscalatorResult<()> {
        ValidationUtils::validate_not_empty(&self.key, "roster.key")?;
        ValidationUtils::validate_not_empty(&self.sheet, "roster.sheet")?;
        ValidationUtils::validate_digits(&self.trunk_prefix, "roster.trunk_prefix")?;
        if !self.country_code.starts_with('+') {
            return Err(EscalatorError::config_error(format!(
                "roster.country_code 必须以 + 开头: {}",
                self.country_code
            )));
        }
        ValidationUtils::validate_digits(&self.country_code[1..], "roster.country_code")?;
        if self.min_digits <= self.trunk_prefix.len() {
            return Err(EscalatorError::config_error(
                "roster.min_digits 必须大于长途前缀长度",
            ));
        }
        if self.date_formats.is_empty() {
            return Err(EscalatorError::config_error("roster.date_formats 不能为空"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelephonyMode {
    Http,
    /// 不实际拨号，生成关联ID
    DryRun,
}

/// 电话网关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelephonyConfig {
    pub mode: TelephonyMode,
    pub endpoint: String,
    pub instance_id: String,
    pub contact_flow_id: String,
    pub source_phone_number: String,
    pub request_timeout_seconds: Option<u64>,
    /// 随每次外呼发送的自定义属性
    pub attributes: BTreeMap<String, String>,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            mode: TelephonyMode::DryRun,
            endpoint: "http://127.0.0.1:9090".to_string(),
            instance_id: "**********".to_string(),
            contact_flow_id: "**********".to_string(),
            source_phone_number: "+14843019679".to_string(),
            request_timeout_seconds: None,
            attributes: BTreeMap::from([("Message".to_string(), "アラーム発生".to_string())]),
        }
    }
}

impl ConfigValidator for TelephonyConfig {
    fn validate(&self) -> EscalatorResult<()> {
        if self.mode == TelephonyMode::Http {
            ValidationUtils::validate_url(&self.endpoint, "telephony.endpoint")?;
        }
        ValidationUtils::validate_not_empty(&self.instance_id, "telephony.instance_id")?;
        ValidationUtils::validate_not_empty(&self.contact_flow_id, "telephony.contact_flow_id")?;
        ValidationUtils::validate_not_empty(
            &self.source_phone_number,
            "telephony.source_phone_number",
        )?;
        if let Some(timeout) = self.request_timeout_seconds {
            ValidationUtils::validate_range(
                timeout as i64,
                1,
                900,
                "telephony.request_timeout_seconds",
            )?;
        }
        Ok(())
    }
}

/// 发信器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 决定"今天"所用的固定时区偏移
    pub utc_offset_hours: i32,
    /// 呼叫日志键的扩展名
    pub log_extension: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            log_extension: "json".to_string(),
        }
    }
}

impl ConfigValidator for DispatcherConfig {
    fn validate(&self) -> EscalatorResult<()> {
        ValidationUtils::validate_range(
            self.utc_offset_hours as i64,
            -12,
            14,
            "dispatcher.utc_offset_hours",
        )?;
        ValidationUtils::validate_not_empty(&self.log_extension, "dispatcher.log_extension")?;
        Ok(())
    }
}

/// 关联器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelatorConfig {
    /// 复核后日志键的后缀
    pub reviewed_suffix: String,
    /// 携带用户按键的事件模块类型
    pub ivr_module_type: String,
    pub available_digit: String,
    pub unavailable_digit: String,
    /// 是否优先按关联ID查找运行记录
    pub correlation_index_enabled: bool,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            reviewed_suffix: "_checked".to_string(),
            ivr_module_type: "GetUserInput".to_string(),
            available_digit: "1".to_string(),
            unavailable_digit: "2".to_string(),
            correlation_index_enabled: true,
        }
    }
}

impl ConfigValidator for CorrelatorConfig {
    fn validate(&self) -> EscalatorResult<()> {
        ValidationUtils::validate_not_empty(&self.reviewed_suffix, "correlator.reviewed_suffix")?;
        ValidationUtils::validate_not_empty(&self.ivr_module_type, "correlator.ivr_module_type")?;
        ValidationUtils::validate_not_empty(&self.available_digit, "correlator.available_digit")?;
        ValidationUtils::validate_not_empty(
            &self.unavailable_digit,
            "correlator.unavailable_digit",
        )?;
        if self.available_digit == self.unavailable_digit {
            return Err(EscalatorError::config_error(
                "correlator.available_digit 与 unavailable_digit 不能相同",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvokerMode {
    /// 以独立进程重新执行 `dispatch`
    Process,
    /// 只记录日志，不触发升级
    Disabled,
}

/// 升级调用器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    pub mode: InvokerMode,
    /// 缺省时使用当前可执行文件
    pub executable: Option<String>,
    /// 传给子进程的配置文件路径
    pub config_path: Option<String>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            mode: InvokerMode::Process,
            executable: None,
            config_path: None,
        }
    }
}

impl ConfigValidator for InvokerConfig {
    fn validate(&self) -> EscalatorResult<()> {
        if let Some(executable) = &self.executable {
            ValidationUtils::validate_not_empty(executable, "invoker.executable")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ConfigValidator for ObservabilityConfig {
    fn validate(&self) -> EscalatorResult<()> {
        self.log_level.parse::<crate::logging::LogLevel>()?;
        self.log_format.parse::<crate::logging::OutputFormat>()?;
        Ok(())
    }
}
