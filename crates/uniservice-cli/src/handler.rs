//! Handler hosted by `uniservice run`.

use tracing::{info, warn};
use uniservice::{HandlerError, Logger, Service, ServiceHandler};

use crate::CLI_TARGET;

/// Reports start and stop through the session logger and otherwise idles
/// until shutdown.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingHandler;

impl LoggingHandler {
    fn report(service: &Service, message: &str) {
        let delivered = service
            .logger()
            .and_then(|logger: Box<dyn Logger>| logger.info(message));
        if let Err(error) = delivered {
            warn!(target: CLI_TARGET, %error, "session logger unavailable");
        }
        info!(target: CLI_TARGET, service = service.descriptor().name(), "{message}");
    }
}

impl ServiceHandler for LoggingHandler {
    fn start(&self, service: &Service) -> Result<(), HandlerError> {
        Self::report(
            service,
            &format!("{service} started on {}", service.host_system()),
        );
        Ok(())
    }

    fn stop(&self, service: &Service) -> Result<(), HandlerError> {
        Self::report(service, &format!("{service} stopping"));
        Ok(())
    }
}
