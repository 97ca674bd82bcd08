pub mod clock;
pub mod invoker;
pub mod object_store;
pub mod telephony;

pub use clock::*;
pub use invoker::*;
pub use object_store::*;
pub use telephony::*;
