use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// 安装进程级的 Prometheus 指标记录器
///
/// 命令行进程生命周期很短，不开放 HTTP 端口；结束时通过 [`PrometheusHandle::render`] 输出快照。
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("安装指标记录器失败: {}", e))?;
    info!("指标记录器已初始化");
    Ok(handle)
}
