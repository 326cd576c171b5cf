/*!
 * Signal Dispatcher
 * Mask lifecycle, handler registration, and the blocking dispatch loop
 */

use super::registry::{HandlerEntry, HandlerRegistry};
use super::timeout::TimeoutConfig;
use super::types::{DispatchError, DispatchResult};
use super::wait::{self, WaitOutcome};
use log::{debug, info, trace};
use nix::sys::signal::{SigSet, Signal};
use std::time::Duration;

/// Synchronous signal dispatcher.
///
/// Owns the signal mask, the handler registry, and the idle-timeout
/// configuration. Lifecycle: construct, [`initialize`](Self::initialize)
/// before any other thread exists, register handlers, then call
/// [`run`](Self::run) from the thread dedicated to signal dispatch. `run`
/// takes the dispatcher by exclusive borrow, so registration while the loop
/// is executing does not compile.
pub struct SignalDispatcher {
    registry: HandlerRegistry,
    timeout: TimeoutConfig,
    initialized: bool,
}

impl SignalDispatcher {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            timeout: TimeoutConfig::default(),
            initialized: false,
        }
    }

    /// Block every signal on the calling thread.
    ///
    /// Must run before any other thread is created so the all-blocked mask
    /// is inherited process-wide; from then on no thread takes an
    /// asynchronous signal trap. Calling it again is harmless.
    pub fn initialize(&mut self) -> DispatchResult<()> {
        SigSet::all()
            .thread_set_mask()
            .map_err(DispatchError::MaskSetup)?;

        self.initialized = true;
        info!("Signal dispatcher initialized, all signals blocked");
        Ok(())
    }

    /// Register a handler for a signal number.
    ///
    /// The signal joins the waited-on set once [`run`](Self::run) starts;
    /// until then registration is pure local state. Re-registering a signal
    /// overwrites the previous entry. With `terminate` set, dispatching the
    /// signal ends the loop after the handler returns.
    pub fn register_handler<F>(
        &mut self,
        signum: i32,
        handler: F,
        terminate: bool,
    ) -> DispatchResult<()>
    where
        F: FnMut() + Send + 'static,
    {
        let signal = lookup(signum)?;
        debug!("Registering handler for {} (terminate: {})", signal, terminate);
        self.registry
            .insert(signal, HandlerEntry::new(Some(Box::new(handler)), terminate));
        Ok(())
    }

    /// Register a signal that ends the loop without running a callback.
    pub fn register_termination_signal(&mut self, signum: i32) -> DispatchResult<()> {
        let signal = lookup(signum)?;
        debug!("Registering termination signal {}", signal);
        self.registry.insert(signal, HandlerEntry::new(None, true));
        Ok(())
    }

    /// Register a signal to be consumed silently.
    ///
    /// The signal still wakes the wait loop but produces no observable
    /// effect, and its default OS disposition never resumes.
    pub fn register_ignored_signal(&mut self, signum: i32) -> DispatchResult<()> {
        let signal = lookup(signum)?;
        debug!("Registering ignored signal {}", signal);
        self.registry.insert(signal, HandlerEntry::new(None, false));
        Ok(())
    }

    /// Set the idle-timeout interval and callback (last write wins).
    ///
    /// Without this the dispatcher uses a no-op callback at the default
    /// ten-minute interval. Sub-second intervals are honored.
    pub fn set_timeout_handler<F>(&mut self, timeout: Duration, handler: F)
    where
        F: FnMut() + Send + 'static,
    {
        debug!("Setting timeout handler with interval {:?}", timeout);
        self.timeout = TimeoutConfig::new(timeout, Box::new(handler));
    }

    /// Whether `initialize` has completed successfully
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of registered signals
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the given signal number has a registered entry
    pub fn handles(&self, signum: i32) -> bool {
        Signal::try_from(signum)
            .map(|signal| self.registry.contains(signal))
            .unwrap_or(false)
    }

    /// Dispatch signals until a terminating handler fires.
    ///
    /// Blocks the calling thread, which must have inherited the mask
    /// installed by [`initialize`](Self::initialize). Registered signals are
    /// consumed one at a time, strictly in arrival order, and their handlers
    /// run as ordinary synchronous code on this thread; locks and I/O are
    /// safe inside them. When no registered signal arrives within the
    /// configured interval the timeout callback runs and the loop continues.
    /// Everything outside the registered set stays blocked for the whole
    /// loop.
    pub fn run(&mut self) -> DispatchResult<()> {
        if !self.initialized {
            return Err(DispatchError::NotInitialized);
        }
        if self.registry.is_empty() {
            return Err(DispatchError::NoHandlers);
        }

        let set = self.registry.wait_set();
        let interval = wait::wait_interval(self.timeout.duration())?;
        info!("Dispatch loop started with {} registered signals", self.registry.len());

        loop {
            match wait::wait_timed(&set, &interval)? {
                WaitOutcome::TimedOut => {
                    trace!("Wait timed out, firing timeout handler");
                    self.timeout.fire();
                }
                WaitOutcome::Interrupted => {
                    // Racing unregistered signal; an expected steady-state
                    // iteration, not an error
                    trace!("Wait interrupted by a signal outside the set");
                }
                WaitOutcome::Delivered(signal) => {
                    debug!("Dispatching {}", signal);
                    let entry = self
                        .registry
                        .get_mut(signal)
                        .ok_or(DispatchError::MissingHandler(signal))?;
                    entry.invoke();
                    if entry.terminates() {
                        info!("Terminating handler for {} fired, stopping dispatch", signal);
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Default for SignalDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a raw signal number, rejecting anything the platform does not know
fn lookup(signum: i32) -> DispatchResult<Signal> {
    Signal::try_from(signum).map_err(|_| DispatchError::InvalidSignal(signum))
}
