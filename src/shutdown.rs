//! Cooperative shutdown.
//!
//! A [`ShutdownToken`] is handed to every loop that can suspend.  Loops
//! check it each time they wake, so a termination request is honoured
//! within one poll interval and work already accepted is finished first.

use log::info;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable stop flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Trigger this token on SIGINT or SIGTERM.
    ///
    /// Signals are collected on a dedicated thread; dropping the returned
    /// guard unregisters them and joins that thread.
    pub fn install_signal_handler(&self) -> std::io::Result<SignalGuard> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let token = self.clone();
        let thread = std::thread::Builder::new()
            .name("clef-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    info!("received signal {}, shutting down", signal);
                    token.trigger();
                }
            })?;
        Ok(SignalGuard {
            handle,
            thread: Some(thread),
        })
    }
}

/// Keeps the signal handler installed while alive.
#[derive(Debug)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
