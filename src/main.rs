/*!
 * Worker Shutdown Demo
 *
 * Consumer-side example: block all signals, spawn worker threads parked on
 * a condition variable, then release and join them from a SIGTERM handler
 * running as ordinary synchronous code on the dispatch thread.
 */

use anyhow::Result;
use log::info;
use parking_lot::{Condvar, Mutex};
use sigdispatch::{Signal, SignalDispatcher};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

type Shutdown = Arc<(Mutex<bool>, Condvar)>;

fn worker(name: &'static str, shutdown: Shutdown) {
    let (lock, cv) = &*shutdown;
    let mut stop = lock.lock();
    while !*stop {
        cv.wait(&mut stop);
    }
    info!("{} stopped", name);
}

fn main() -> Result<()> {
    env_logger::init();

    let mut dispatcher = SignalDispatcher::new();

    // Block everything before the workers exist so they inherit the mask
    dispatcher.initialize()?;

    let shutdown: Shutdown = Arc::new((Mutex::new(false), Condvar::new()));
    let handles = vec![
        {
            let shutdown = shutdown.clone();
            thread::spawn(move || worker("worker-1", shutdown))
        },
        {
            let shutdown = shutdown.clone();
            thread::spawn(move || worker("worker-2", shutdown))
        },
    ];

    let mut workers = Some(handles);
    let handler_shutdown = shutdown.clone();
    dispatcher.register_handler(
        Signal::SIGTERM as i32,
        move || {
            // Locks, logging, joins: all safe here
            info!("SIGTERM received, notifying workers");
            {
                let (lock, cv) = &*handler_shutdown;
                *lock.lock() = true;
                cv.notify_all();
            }
            if let Some(handles) = workers.take() {
                for handle in handles {
                    let _ = handle.join();
                }
            }
            info!("Workers joined");
        },
        true,
    )?;

    // A stray SIGHUP (e.g. a closing terminal) must not kill the demo
    dispatcher.register_ignored_signal(Signal::SIGHUP as i32)?;

    dispatcher.set_timeout_handler(Duration::from_secs(30), || {
        info!("Idle, still waiting for SIGTERM");
    });

    info!(
        "Dispatching on PID {pid}; stop with: kill {pid}",
        pid = std::process::id()
    );
    dispatcher.run()?;

    info!("Dispatch loop terminated, exiting");
    Ok(())
}
