//! Async runtime adapter: executes backend requests and sends the responses
//! back to the thread that owns the store.

mod message;
mod runtime;

pub use message::AppMessage;
pub use runtime::AsyncRuntime;
