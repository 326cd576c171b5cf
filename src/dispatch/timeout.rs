/*!
 * Timeout Configuration
 * Idle-timeout duration and callback for the wait loop
 */

use std::time::Duration;

/// Timeout callback function type
pub type TimeoutHandler = Box<dyn FnMut() + Send>;

/// Default interval between idle wakeups (ten minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Idle-timeout configuration for the wait loop.
///
/// One configuration is active at a time; setting a new one replaces the
/// previous duration and callback together.
pub struct TimeoutConfig {
    duration: Duration,
    handler: TimeoutHandler,
}

impl TimeoutConfig {
    pub fn new(duration: Duration, handler: TimeoutHandler) -> Self {
        Self { duration, handler }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Invoke the timeout callback
    pub fn fire(&mut self) {
        (self.handler)();
    }
}

impl Default for TimeoutConfig {
    /// No-op callback at the default ten-minute interval
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, Box::new(|| {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn default_is_ten_minutes() {
        let mut config = TimeoutConfig::default();
        assert_eq!(config.duration(), Duration::from_secs(600));
        // Firing the default handler is a no-op
        config.fire();
    }

    #[test]
    fn fire_invokes_the_callback() {
        let counter = Arc::new(AtomicUsize::new(0));
        let cloned = counter.clone();
        let mut config = TimeoutConfig::new(
            Duration::from_millis(100),
            Box::new(move || {
                cloned.fetch_add(1, Ordering::SeqCst);
            }),
        );

        config.fire();
        config.fire();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
