//! 基础设施层：对象存储、运行状态与呼叫日志持久化、电话网关、升级调用器

pub mod call_log_store;
pub mod clock;
pub mod factory;
pub mod fs_store;
pub mod in_memory_store;
pub mod invoker;
pub mod state_store;
pub mod telephony;

pub use call_log_store::CallLogStore;
pub use clock::SystemClock;
pub use factory::InfrastructureFactory;
pub use fs_store::FsObjectStore;
pub use in_memory_store::{InMemoryObjectStore, StoredObject};
pub use invoker::{DisabledInvoker, ProcessInvoker};
pub use state_store::StateStore;
pub use telephony::{DryRunTelephonyGateway, HttpTelephonyGateway};
