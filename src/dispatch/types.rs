/*!
 * Dispatch Types
 * Error taxonomy and result alias for signal dispatch
 */

use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::time::Duration;
use thiserror::Error;

/// Dispatch operation result
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Dispatch errors
///
/// Configuration errors surface synchronously from the offending call;
/// `InvalidTimeout` and `MissingHandler` abort the wait loop and propagate
/// to whoever called `run`. None of them are retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("failed to install blocking signal mask: {0}")]
    MaskSetup(Errno),

    #[error("invalid signal number: {0}")]
    InvalidSignal(i32),

    #[error("dispatcher is not initialized")]
    NotInitialized,

    #[error("no signal handlers registered")]
    NoHandlers,

    #[error("timeout not representable as a wait interval: {0:?}")]
    InvalidTimeout(Duration),

    #[error("signal {0} arrived with no registered handler")]
    MissingHandler(Signal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        assert_eq!(
            DispatchError::InvalidSignal(999).to_string(),
            "invalid signal number: 999"
        );
        assert_eq!(
            DispatchError::MissingHandler(Signal::SIGTERM).to_string(),
            "signal SIGTERM arrived with no registered handler"
        );
    }
}
