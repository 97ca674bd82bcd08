use std::fmt;
use std::str::FromStr;

use crate::config::ObservabilityConfig;
use crate::logging::log_level::LogLevel;
use crate::{EscalatorError, EscalatorResult};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl FromStr for OutputFormat {
    type Err = EscalatorError;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" | "text" => Ok(OutputFormat::Pretty),
            _ => Err(EscalatorError::Configuration(format!(
                "不支持的日志格式: {format}"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Pretty => f.write_str("pretty"),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: OutputFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: OutputFormat::Pretty,
        }
    }
}

impl LogConfig {
    pub fn from_observability(config: &ObservabilityConfig) -> EscalatorResult<Self> {
        Ok(Self {
            level: config.log_level.parse()?,
            format: config.log_format.parse()?,
        })
    }

    /// `LOG_LEVEL` / `LOG_FORMAT` 环境变量覆盖，无法解析的值被忽略
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            if let Ok(level) = level.parse() {
                self.level = level;
            }
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.format = format;
            }
        }
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_observability() {
        let observability = ObservabilityConfig {
            log_level: "WARNING".to_string(),
            log_format: "json".to_string(),
        };
        let config = LogConfig::from_observability(&observability).unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = LogConfig::default()
            .with_level(LogLevel::Debug)
            .with_format(OutputFormat::Json);
        assert_eq!(config.level.as_filter(), "debug");
        assert_eq!(config.format.to_string(), "json");
    }
}
