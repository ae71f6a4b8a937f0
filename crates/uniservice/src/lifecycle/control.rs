use std::thread;

use tracing::info;

use crate::command::{ControlAction, ServiceCommand};

use super::{LIFECYCLE_TARGET, Service, ServiceError};

impl Service {
    /// Asks the init system to start the service.
    pub fn start(&self) -> Result<(), ServiceError> {
        self.control(ControlAction::Start)
    }

    /// Asks the init system to stop the service.
    pub fn stop(&self) -> Result<(), ServiceError> {
        self.control(ControlAction::Stop)
    }

    /// Stops, waits [`RESTART_DELAY`](super::RESTART_DELAY), then starts.
    ///
    /// A failed stop is returned without attempting the start.
    pub fn restart(&self) -> Result<(), ServiceError> {
        self.stop()?;
        thread::sleep(self.restart_delay);
        self.start()
    }

    fn control(&self, action: ControlAction) -> Result<(), ServiceError> {
        let command = ServiceCommand::control(self.flavor, action, self.descriptor.name());
        self.runner.run(&command)?;
        info!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            %action,
            command = %command,
            "service control command succeeded"
        );
        Ok(())
    }
}
