use tracing::{info, warn};

use crate::shutdown::{ShutdownSignal, SystemShutdownSignal};

use super::{LIFECYCLE_TARGET, Service, ServiceError};

impl Service {
    /// Runs the handler in the foreground until SIGINT or SIGTERM.
    ///
    /// The signal handlers are installed before the start hook runs, so a
    /// signal arriving while the handler starts still leads to a clean stop.
    pub fn run(&self) -> Result<(), ServiceError> {
        let shutdown = SystemShutdownSignal::listen()?;
        self.run_until(&shutdown)
    }

    /// Runs the handler until `shutdown` fires.
    ///
    /// A failing start hook is returned immediately without waiting or
    /// calling the stop hook. Otherwise the stop hook's result is returned.
    pub fn run_until(&self, shutdown: &dyn ShutdownSignal) -> Result<(), ServiceError> {
        self.handler
            .start(self)
            .map_err(|source| ServiceError::HandlerStart { source })?;
        info!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            interactive = self.interactive,
            "service running; waiting for shutdown signal"
        );

        if let Err(error) = shutdown.wait() {
            // The handler is already running; stop it before reporting.
            if let Err(stop_error) = self.handler.stop(self) {
                warn!(
                    target: LIFECYCLE_TARGET,
                    service = self.descriptor.name(),
                    error = %stop_error,
                    "stop hook failed after shutdown listener error"
                );
            }
            return Err(error.into());
        }

        self.handler
            .stop(self)
            .map_err(|source| ServiceError::HandlerStop { source })?;
        info!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            "service stopped"
        );
        Ok(())
    }
}
