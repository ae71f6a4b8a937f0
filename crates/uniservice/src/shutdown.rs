use std::fmt;
use std::io;
use std::sync::{Mutex, PoisonError};

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::{debug, info};

use crate::lifecycle::LIFECYCLE_TARGET;

/// Abstraction over shutdown notification mechanisms.
pub trait ShutdownSignal: Send + Sync {
    /// Blocks until shutdown should proceed.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Listener for SIGINT and SIGTERM.
///
/// Handlers are installed by [`SystemShutdownSignal::listen`], so a signal
/// delivered between construction and [`ShutdownSignal::wait`] is queued
/// rather than terminating the process.
pub struct SystemShutdownSignal {
    signals: Mutex<Signals>,
}

impl SystemShutdownSignal {
    /// Installs the handlers and starts queueing signals.
    pub fn listen() -> Result<Self, ShutdownError> {
        let signals =
            Signals::new([SIGINT, SIGTERM]).map_err(|source| ShutdownError::Install { source })?;
        debug!(target: LIFECYCLE_TARGET, "listening for SIGINT and SIGTERM");
        Ok(Self {
            signals: Mutex::new(signals),
        })
    }
}

impl fmt::Debug for SystemShutdownSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SystemShutdownSignal")
            .finish_non_exhaustive()
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(signal) = signals.forever().next() {
            info!(target: LIFECYCLE_TARGET, signal, "shutdown signal received");
        }
        Ok(())
    }
}
