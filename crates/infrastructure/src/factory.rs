use std::sync::Arc;

use escalator_core::{
    config::{InvokerMode, StorageBackend, TelephonyMode},
    AppConfig, Clock, DispatchInvoker, EscalatorResult, ObjectStore, TelephonyGateway,
};
use tracing::{debug, info};

use crate::{
    DisabledInvoker, DryRunTelephonyGateway, FsObjectStore, HttpTelephonyGateway,
    InMemoryObjectStore, ProcessInvoker, SystemClock,
};

/// 按配置创建各基础设施组件
pub struct InfrastructureFactory;

impl InfrastructureFactory {
    pub fn object_store(config: &AppConfig) -> EscalatorResult<Arc<dyn ObjectStore>> {
        debug!("创建对象存储: {:?}", config.storage.backend);
        match config.storage.backend {
            StorageBackend::Filesystem => {
                let store = FsObjectStore::new(&config.storage.root);
                info!("使用文件系统对象存储: {}", store.root().display());
                Ok(Arc::new(store))
            }
            StorageBackend::Memory => {
                info!("使用内存对象存储");
                Ok(Arc::new(InMemoryObjectStore::new()))
            }
        }
    }

    pub fn telephony_gateway(config: &AppConfig) -> EscalatorResult<Arc<dyn TelephonyGateway>> {
        match config.telephony.mode {
            TelephonyMode::Http => {
                info!("使用HTTP电话网关: {}", config.telephony.endpoint);
                Ok(Arc::new(HttpTelephonyGateway::new(&config.telephony)?))
            }
            TelephonyMode::DryRun => {
                info!("使用dry-run电话网关，不会实际拨号");
                Ok(Arc::new(DryRunTelephonyGateway))
            }
        }
    }

    pub fn dispatch_invoker(config: &AppConfig) -> EscalatorResult<Arc<dyn DispatchInvoker>> {
        match config.invoker.mode {
            InvokerMode::Process => Ok(Arc::new(ProcessInvoker::new(&config.invoker)?)),
            InvokerMode::Disabled => Ok(Arc::new(DisabledInvoker)),
        }
    }

    pub fn clock(config: &AppConfig) -> EscalatorResult<Arc<dyn Clock>> {
        let clock = SystemClock::with_offset_hours(config.dispatcher.utc_offset_hours)?;
        debug!("系统时钟时区偏移: {}", clock.offset());
        Ok(Arc::new(clock))
    }
}
