//! Background processing tasks
//!
//! Asynchronous uploads are processed off the request path:
//! - `TaskStore` holds bounded, expiring task state keyed by task id
//! - `TaskRunner` runs pipelines with bounded concurrency and records the
//!   outcome, including panics, so clients never poll forever

mod store;
mod types;
mod worker;

pub use store::TaskStore;
pub use types::{TaskEntry, TaskState, TaskStatus, TIMED_OUT_MESSAGE};
pub use worker::{TaskRunner, PANIC_MESSAGE};
