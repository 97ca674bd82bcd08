use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use escalator::{telemetry, Application};
use escalator_core::{
    logging::{LogConfig, OutputFormat},
    AppConfig, DispatchRequest, InvocationResponse,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "escalator")]
#[command(version = "1.0.0")]
#[command(about = "顺序外呼升级通知系统")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// 日志格式
    #[arg(long, global = true, value_parser = ["json", "pretty"])]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 呼叫下一位候选人；不带下标时开始新的周期
    Dispatch {
        /// 候选人下标
        #[arg(long)]
        next_index: Option<usize>,
        /// 触发负载 (JSON格式)，例如 {"next_index": 1}
        #[arg(long, conflicts_with = "next_index")]
        payload: Option<String>,
    },
    /// 处理一个呼叫流程事件批次
    Correlate {
        /// 输入文件，`-` 表示标准输入
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// 打印生效的配置
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    // 升级时子进程沿用同一份配置文件
    if config.invoker.config_path.is_none() {
        config.invoker.config_path = cli.config.clone();
    }

    init_logging(&config, cli.log_level.as_deref(), cli.log_format.as_deref())?;
    let metrics = telemetry::init_metrics()?;

    let response = match cli.command {
        Commands::ShowConfig => {
            println!("{}", config.to_toml()?);
            return Ok(());
        }
        Commands::Dispatch {
            next_index,
            payload,
        } => {
            let request = match payload {
                Some(payload) => serde_json::from_str::<DispatchRequest>(&payload)
                    .context("解析触发负载失败")?,
                None => DispatchRequest { next_index },
            };
            let app = Application::new(config)?;
            app.run_dispatch(request).await
        }
        Commands::Correlate { input } => {
            let body = read_input(&input)?;
            let app = Application::new(config)?;
            app.run_correlate(&body).await
        }
    };

    finish(response, &metrics)
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("读取标准输入失败")?;
        return Ok(body);
    }
    std::fs::read(input).with_context(|| format!("读取输入文件失败: {input}"))
}

fn finish(response: InvocationResponse, metrics: &PrometheusHandle) -> Result<()> {
    println!("{}", serde_json::to_string(&response)?);
    info!("处理结束: {}", response.status_code);
    info!("指标快照:\n{}", metrics.render());
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// 初始化日志系统
///
/// 优先级：RUST_LOG > 命令行参数 > LOG_LEVEL/LOG_FORMAT 环境变量 > 配置文件
fn init_logging(config: &AppConfig, level: Option<&str>, format: Option<&str>) -> Result<()> {
    let mut log_config = LogConfig::from_observability(&config.observability)?.with_env_overrides();
    if let Some(level) = level {
        log_config = log_config.with_level(level.parse()?);
    }
    if let Some(format) = format {
        log_config = log_config.with_format(format.parse()?);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.level.as_filter()));
    // 标准输出留给 InvocationResponse
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_config.format {
        OutputFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("初始化JSON日志格式失败")?,
        OutputFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
            .context("初始化Pretty日志格式失败")?,
    }

    Ok(())
}
