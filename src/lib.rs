/*!
 * sigdispatch
 * Synchronous UNIX signal dispatch on a dedicated thread
 *
 * Blocks every signal up front, then lets a single thread wait for a
 * registered subset and run ordinary (non async-signal-safe) handler code
 * for each delivery, with an idle-timeout fallback.
 */

pub mod dispatch;

// Re-exports
pub use dispatch::{
    DispatchError, DispatchResult, Handler, HandlerEntry, HandlerRegistry, SignalDispatcher,
    TimeoutConfig, TimeoutHandler, DEFAULT_TIMEOUT,
};
pub use nix::sys::signal::Signal;
