//! Chord → command dispatch.
//!
//! Commands are spawned without waiting, so a slow program cannot hold up
//! the next chord.  Spawn failures are logged and the loop moves on; a
//! chord with no binding is ignored.

use crate::chord::Chord;
use crate::config::BindingTable;
use crate::traits::{ChordSink, Launcher};
use log::{debug, error, info, warn};
use std::convert::Infallible;
use std::process::Child;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What happened to one dispatched chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No binding for this chord.
    Unbound,
    /// The bound command was started.
    Launched { pid: u32 },
    /// The bound command could not be started.
    Failed,
}

/// Looks chords up in a [`BindingTable`] and starts the bound command.
pub struct ActionDispatcher<L> {
    table: BindingTable,
    launcher: L,
}

impl<L: Launcher> ActionDispatcher<L> {
    pub fn new(table: BindingTable, launcher: L) -> Self {
        Self { table, launcher }
    }

    /// Dispatch a canonical chord string.
    pub fn dispatch(&mut self, chord: &str) -> Dispatch {
        let Some(command) = self.table.lookup(chord) else {
            debug!("no binding for '{}'", chord);
            return Dispatch::Unbound;
        };
        match self.launcher.launch(command.program(), command.args()) {
            Ok(pid) => {
                info!("'{}' -> {} (pid {})", chord, command, pid);
                Dispatch::Launched { pid }
            }
            Err(e) => {
                error!("failed to spawn '{}' for '{}': {}", command, chord, e);
                Dispatch::Failed
            }
        }
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

/// Standalone mode: the observer hands chords straight to the dispatcher.
impl<L: Launcher> ChordSink for ActionDispatcher<L> {
    type Error = Infallible;

    fn deliver(&mut self, chord: &Chord) -> Result<(), Infallible> {
        self.dispatch(&chord.to_string());
        Ok(())
    }
}

/// [`Launcher`] that starts real processes.
///
/// Children inherit the environment and standard streams.  Each child is
/// handed to its own waiter thread, which reaps it as soon as it exits and
/// logs a failing status.  Children still running when the launcher is
/// dropped are left to finish on their own.
#[derive(Debug, Default)]
pub struct ProcessLauncher {
    running: Arc<AtomicUsize>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children started and not yet reaped.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }
}

fn reap(program: &str, mut child: Child, running: &AtomicUsize) {
    let pid = child.id();
    match child.wait() {
        Ok(status) if status.success() => debug!("{} (pid {}) exited", program, pid),
        Ok(status) => warn!("{} (pid {}) exited with {}", program, pid, status),
        Err(e) => warn!("failed to wait for {} (pid {}): {}", program, pid, e),
    }
    running.fetch_sub(1, Ordering::SeqCst);
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, program: &str, args: &[String]) -> std::io::Result<u32> {
        let child = std::process::Command::new(program).args(args).spawn()?;
        let pid = child.id();

        self.running.fetch_add(1, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let name = program.to_string();
        let waiter = std::thread::Builder::new()
            .name(format!("clef-reap-{}", pid))
            .spawn(move || reap(&name, child, &running));
        if let Err(e) = waiter {
            // The child still runs but stays unreaped until clef exits.
            self.running.fetch_sub(1, Ordering::SeqCst);
            warn!("no waiter for {} (pid {}): {}", program, pid, e);
        }
        Ok(pid)
    }
}

impl Drop for ProcessLauncher {
    fn drop(&mut self) {
        let running = self.running();
        if running > 0 {
            debug!("{} command(s) still running at exit", running);
        }
    }
}
