/*!
 * Handler Registry
 * Signal-keyed handler entries with last-write-wins registration
 */

use log::debug;
use nix::sys::signal::{SigSet, Signal};
use std::collections::HashMap;

/// Signal handler callback function type
pub type Handler = Box<dyn FnMut() + Send>;

/// Registered disposition for a single signal
///
/// An absent callback means the signal is consumed without effect; the
/// terminate flag ends the dispatch loop after the entry runs.
pub struct HandlerEntry {
    callback: Option<Handler>,
    terminate: bool,
}

impl HandlerEntry {
    pub fn new(callback: Option<Handler>, terminate: bool) -> Self {
        Self {
            callback,
            terminate,
        }
    }

    /// Invoke the callback if one is present
    pub fn invoke(&mut self) {
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
    }

    /// Whether dispatching this entry ends the wait loop
    pub fn terminates(&self) -> bool {
        self.terminate
    }
}

/// Registry mapping each signal to at most one handler entry
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<Signal, HandlerEntry>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert an entry for a signal, overwriting any previous registration
    pub fn insert(&mut self, signal: Signal, entry: HandlerEntry) {
        if self.entries.insert(signal, entry).is_some() {
            debug!("Replaced existing handler entry for {}", signal);
        }
    }

    pub fn get_mut(&mut self, signal: Signal) -> Option<&mut HandlerEntry> {
        self.entries.get_mut(&signal)
    }

    pub fn contains(&self, signal: Signal) -> bool {
        self.entries.contains_key(&signal)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Derive the wait set from the registered signals.
    ///
    /// The set is rebuilt from the key set every time, so it cannot drift
    /// from the registry contents.
    pub fn wait_set(&self) -> SigSet {
        let mut set = SigSet::empty();
        for signal in self.entries.keys() {
            set.add(*signal);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_entry(counter: &Arc<AtomicUsize>, terminate: bool) -> HandlerEntry {
        let counter = counter.clone();
        HandlerEntry::new(
            Some(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            terminate,
        )
    }

    #[test]
    fn invoke_runs_callback_each_time() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut entry = counting_entry(&counter, false);

        entry.invoke();
        entry.invoke();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!entry.terminates());
    }

    #[test]
    fn absent_callback_is_a_silent_consume() {
        let mut entry = HandlerEntry::new(None, true);
        entry.invoke();
        assert!(entry.terminates());
    }

    #[test]
    fn reregistration_overwrites() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut registry = HandlerRegistry::new();
        registry.insert(Signal::SIGUSR1, counting_entry(&first, false));
        registry.insert(Signal::SIGUSR1, counting_entry(&second, true));
        assert_eq!(registry.len(), 1);

        let entry = registry.get_mut(Signal::SIGUSR1).unwrap();
        entry.invoke();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(entry.terminates());
    }

    #[test]
    fn wait_set_matches_registered_keys() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());

        registry.insert(Signal::SIGUSR1, HandlerEntry::new(None, false));
        registry.insert(Signal::SIGTERM, HandlerEntry::new(None, true));

        let set = registry.wait_set();
        assert!(set.contains(Signal::SIGUSR1));
        assert!(set.contains(Signal::SIGTERM));
        assert!(!set.contains(Signal::SIGHUP));
    }
}
