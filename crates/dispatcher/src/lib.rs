//! 发信侧：读取值班名册，选出候选人并拨号，持久化呼叫日志和运行指针

pub mod call_dispatcher;
pub mod roster;

pub use call_dispatcher::{eligible_candidates, CallDispatcher, DispatchOutcome};
pub use roster::{normalize_phone, DateMatcher, RosterReader};
