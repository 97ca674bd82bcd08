//! # 数据模型
//!
//! 升级外呼系统的核心数据结构。
//!
//! - [`Candidate`] - 从名册中规范化得到的外呼对象
//! - [`CallAttemptRecord`] - 一次呼叫尝试，对应 [`CallLogSheet`] 中的一行
//! - [`RunPointer`] - 发信运行交给关联运行的指针
//! - [`OutcomeEvent`] - 呼叫流程上报的事件
//! - [`DispatchRequest`] / [`InvocationResponse`] - 入口的输入与输出
//!
//! ## 应答状态流转
//! ```text
//! Pending → AnsweredAvailable
//!         → AnsweredUnavailable → (新记录，下一位候选人)
//!         → NoAnswer            → (新记录，下一位候选人)
//! ```

pub mod call_attempt;
pub mod call_log;
pub mod candidate;
pub mod invocation;
pub mod outcome_event;
pub mod run_pointer;

pub use call_attempt::*;
pub use call_log::*;
pub use candidate::*;
pub use invocation::*;
pub use outcome_event::*;
pub use run_pointer::*;
