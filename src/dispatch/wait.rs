/*!
 * Timed Signal Wait
 * sigtimedwait binding and wait-interval conversion
 *
 * nix wraps sigwait but not its timed variant, so the one raw libc call in
 * the crate lives behind this module.
 */

use super::types::{DispatchError, DispatchResult};
use log::warn;
use nix::errno::Errno;
use nix::sys::signal::{SigSet, Signal};
use std::ptr;
use std::time::Duration;

/// Result of one timed wait on the signal set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    /// A signal from the set became pending and was consumed
    Delivered(Signal),
    /// The interval elapsed with nothing pending
    TimedOut,
    /// The wait was interrupted by a signal outside the set
    Interrupted,
}

/// Convert a timeout duration into the wait primitive's representation.
///
/// A seconds value that does not fit `time_t` is rejected up front; the
/// kernel would report the same malformed interval as EINVAL mid-loop.
pub(crate) fn wait_interval(timeout: Duration) -> DispatchResult<libc::timespec> {
    let tv_sec: libc::time_t = timeout
        .as_secs()
        .try_into()
        .map_err(|_| DispatchError::InvalidTimeout(timeout))?;

    Ok(libc::timespec {
        tv_sec,
        tv_nsec: timeout.subsec_nanos() as libc::c_long,
    })
}

/// Block until a signal in `set` is pending or `interval` elapses.
///
/// The signals in `set` must be blocked on the calling thread, otherwise
/// delivery races the wait.
pub(crate) fn wait_timed(set: &SigSet, interval: &libc::timespec) -> DispatchResult<WaitOutcome> {
    // SAFETY: both pointers come from references that outlive the call; the
    // null siginfo pointer tells the kernel to discard the signal payload.
    let rc = unsafe { libc::sigtimedwait(set.as_ref(), ptr::null_mut(), interval) };

    if rc < 0 {
        return match Errno::last() {
            Errno::EAGAIN => Ok(WaitOutcome::TimedOut),
            Errno::EINTR => Ok(WaitOutcome::Interrupted),
            Errno::EINVAL => Err(DispatchError::InvalidTimeout(Duration::new(
                interval.tv_sec as u64,
                interval.tv_nsec as u32,
            ))),
            errno => {
                // POSIX allows no other errno here
                warn!("sigtimedwait failed unexpectedly: {}", errno);
                Ok(WaitOutcome::Interrupted)
            }
        };
    }

    match Signal::try_from(rc) {
        Ok(signal) => Ok(WaitOutcome::Delivered(signal)),
        Err(_) => {
            warn!("sigtimedwait returned unknown signal number {}", rc);
            Ok(WaitOutcome::Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_carries_subsecond_precision() {
        let interval = wait_interval(Duration::from_millis(1500)).unwrap();
        assert_eq!(interval.tv_sec, 1);
        assert_eq!(interval.tv_nsec, 500_000_000);
    }

    #[test]
    fn zero_interval_is_valid() {
        let interval = wait_interval(Duration::ZERO).unwrap();
        assert_eq!(interval.tv_sec, 0);
        assert_eq!(interval.tv_nsec, 0);
    }

    #[test]
    fn oversized_interval_is_rejected() {
        let timeout = Duration::from_secs(u64::MAX);
        assert!(matches!(
            wait_interval(timeout),
            Err(DispatchError::InvalidTimeout(t)) if t == timeout
        ));
    }
}
