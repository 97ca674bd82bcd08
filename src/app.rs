use std::sync::Arc;

use anyhow::{Context, Result};
use escalator_core::{
    AppConfig, Clock, DispatchInvoker, DispatchRequest, EscalatorError, InvocationResponse,
    ObjectStore, TelephonyGateway,
};
use escalator_correlator::ResponseCorrelator;
use escalator_dispatcher::CallDispatcher;
use escalator_infrastructure::InfrastructureFactory;
use tracing::{error, info};

/// 主应用程序：持有配置和各协作组件，为两个入口提供统一的调用方式
pub struct Application {
    config: AppConfig,
    store: Arc<dyn ObjectStore>,
    gateway: Arc<dyn TelephonyGateway>,
    invoker: Arc<dyn DispatchInvoker>,
    clock: Arc<dyn Clock>,
}

impl Application {
    /// 按配置创建应用实例
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = InfrastructureFactory::object_store(&config).context("创建对象存储失败")?;
        let gateway =
            InfrastructureFactory::telephony_gateway(&config).context("创建电话网关失败")?;
        let invoker =
            InfrastructureFactory::dispatch_invoker(&config).context("创建升级调用器失败")?;
        let clock = InfrastructureFactory::clock(&config).context("创建时钟失败")?;
        Ok(Self::with_components(config, store, gateway, invoker, clock))
    }

    pub fn with_components(
        config: AppConfig,
        store: Arc<dyn ObjectStore>,
        gateway: Arc<dyn TelephonyGateway>,
        invoker: Arc<dyn DispatchInvoker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            gateway,
            invoker,
            clock,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> CallDispatcher {
        CallDispatcher::new(
            self.store.clone(),
            self.gateway.clone(),
            self.clock.clone(),
            &self.config,
        )
    }

    pub fn correlator(&self) -> ResponseCorrelator {
        ResponseCorrelator::new(self.store.clone(), self.invoker.clone(), &self.config)
    }

    /// 发信入口
    pub async fn run_dispatch(&self, request: DispatchRequest) -> InvocationResponse {
        info!("收到发信请求: {:?}", request);
        match self.dispatcher().dispatch(request).await {
            Ok(outcome) => InvocationResponse::ok(outcome.summary()),
            Err(e) => Self::failed(e),
        }
    }

    /// 关联入口，输入为日志订阅投递的原始内容
    pub async fn run_correlate(&self, input: &[u8]) -> InvocationResponse {
        info!("收到事件批次: {} 字节", input.len());
        match self.correlator().correlate_delivery(input).await {
            Ok(outcome) => InvocationResponse::ok(outcome.summary()),
            Err(e) => Self::failed(e),
        }
    }

    fn failed(e: EscalatorError) -> InvocationResponse {
        error!(
            kind = ?e.kind(),
            retryable = e.is_retryable(),
            "处理失败: {}",
            e
        );
        InvocationResponse::failed(&e)
    }
}
