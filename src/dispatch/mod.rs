/*!
 * Dispatch Module
 * Synchronous signal dispatch: mask lifecycle, handler registry, wait loop
 */

mod dispatcher;
mod registry;
mod timeout;
mod types;
mod wait;

// Re-export public API
pub use dispatcher::SignalDispatcher;
pub use registry::{Handler, HandlerEntry, HandlerRegistry};
pub use timeout::{TimeoutConfig, TimeoutHandler, DEFAULT_TIMEOUT};
pub use types::{DispatchError, DispatchResult};
