//! 顺序外呼升级通知系统
//!
//! 发信器按值班名册依次拨号，关联器根据呼叫流程上报的按键结果决定是否继续呼叫下一位。

pub mod app;
pub mod telemetry;

pub use app::Application;
