use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use escalator_core::{
    config::InvokerConfig, DispatchInvoker, DispatchRequest, EscalatorError, EscalatorResult,
};
use tokio::process::Command;
use tracing::{info, warn};

/// 以独立进程重新执行 `dispatch` 子命令
///
/// 子进程启动后即返回，不等待其结束。
pub struct ProcessInvoker {
    executable: PathBuf,
    config_path: Option<String>,
}

impl ProcessInvoker {
    pub fn new(config: &InvokerConfig) -> EscalatorResult<Self> {
        let executable = match &config.executable {
            Some(path) => PathBuf::from(path),
            None => std::env::current_exe()
                .map_err(|e| EscalatorError::Invocation(format!("无法确定可执行文件路径: {e}")))?,
        };
        Ok(Self {
            executable,
            config_path: config.config_path.clone(),
        })
    }

    pub fn arguments(&self, request: &DispatchRequest) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.config_path {
            args.push("--config".to_string());
            args.push(path.clone());
        }
        args.push("dispatch".to_string());
        if let Some(next_index) = request.next_index {
            args.push("--next-index".to_string());
            args.push(next_index.to_string());
        }
        args
    }
}

#[async_trait]
impl DispatchInvoker for ProcessInvoker {
    async fn invoke_async(&self, request: DispatchRequest) -> EscalatorResult<()> {
        let args = self.arguments(&request);
        let child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                EscalatorError::Invocation(format!(
                    "启动发信进程失败 {}: {e}",
                    self.executable.display()
                ))
            })?;

        info!(
            "已异步触发发信器: {} {} (pid={:?})",
            self.executable.display(),
            args.join(" "),
            child.id()
        );
        Ok(())
    }
}

/// 不触发升级，只记录
#[derive(Debug, Default, Clone)]
pub struct DisabledInvoker;

#[async_trait]
impl DispatchInvoker for DisabledInvoker {
    async fn invoke_async(&self, request: DispatchRequest) -> EscalatorResult<()> {
        warn!("升级调用已禁用，跳过: next_index={:?}", request.next_index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_carry_config_and_index() {
        let invoker = ProcessInvoker::new(&InvokerConfig {
            executable: Some("/usr/local/bin/escalator".to_string()),
            config_path: Some("config/escalator.toml".to_string()),
            ..InvokerConfig::default()
        })
        .unwrap();
        assert_eq!(
            invoker.arguments(&DispatchRequest::escalate_to(2)),
            vec!["--config", "config/escalator.toml", "dispatch", "--next-index", "2"]
        );
        assert_eq!(
            invoker.arguments(&DispatchRequest::start_cycle()),
            vec!["--config", "config/escalator.toml", "dispatch"]
        );
    }

    #[tokio::test]
    async fn test_missing_executable_is_invocation_error() {
        let invoker = ProcessInvoker::new(&InvokerConfig {
            executable: Some("/nonexistent/escalator-binary".to_string()),
            ..InvokerConfig::default()
        })
        .unwrap();
        let err = invoker
            .invoke_async(DispatchRequest::escalate_to(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EscalatorError::Invocation(_)));
    }

    #[tokio::test]
    async fn test_disabled_invoker_accepts() {
        assert!(DisabledInvoker
            .invoke_async(DispatchRequest::escalate_to(1))
            .await
            .is_ok());
    }
}
