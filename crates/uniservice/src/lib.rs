//! One lifecycle interface over System-V init, Upstart and systemd.
//!
//! The crate detects which init system manages the host, generates the
//! matching control file (an `/etc/init.d` script, an `/etc/init` job or a
//! systemd unit) and drives the service through the host's own tooling:
//! `service`, `initctl` or `systemctl`. A [`Service`] exposes
//! install, remove, start, stop and restart for operators, and [`Service::run`]
//! for the process itself, which hosts the caller's [`ServiceHandler`] until an
//! interrupt or termination signal arrives.
//!
//! ```rust,no_run
//! use uniservice::{HandlerError, Service, ServiceDescriptor, ServiceHandler};
//!
//! struct Worker;
//!
//! impl ServiceHandler for Worker {
//!     fn start(&self, _service: &Service) -> Result<(), HandlerError> {
//!         Ok(())
//!     }
//!
//!     fn stop(&self, _service: &Service) -> Result<(), HandlerError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), uniservice::ServiceError> {
//! let descriptor = ServiceDescriptor::new("worker").with_description("Processes jobs");
//! let service = Service::new(descriptor, Worker);
//! let report = service.install()?;
//! for warning in report.link_warnings() {
//!     eprintln!("{warning}");
//! }
//! service.start()?;
//! # Ok(())
//! # }
//! ```
//!
//! Every collaborator that touches the host (command execution, executable
//! lookup, the shutdown signal, the filesystem root) can be substituted
//! through [`ServiceBuilder`], which is how the test suites exercise the
//! lifecycle without root privileges.

mod command;
mod descriptor;
mod flavor;
mod host;
mod lifecycle;
mod logger;
mod paths;
mod shutdown;
pub mod telemetry;
mod template;

pub use command::{CommandError, CommandRunner, ControlAction, ServiceCommand, SystemCommandRunner};
pub use descriptor::ServiceDescriptor;
pub use flavor::{HostSystem, InitFlavor, SYSTEMD_MARKER, UPSTART_MARKER, detect_flavor};
pub use host::{CurrentExecutable, ExecutableLocator, is_interactive};
pub use lifecycle::{
    HandlerError, InstallReport, RESTART_DELAY, RemoveReport, RunlevelLinkError, Service,
    ServiceBuilder, ServiceError, ServiceHandler,
};
pub use logger::{ConsoleLogger, Logger, LoggerError, SYSLOG_SOCKET, Severity, SyslogLogger};
pub use paths::{ConfigPath, RunlevelLink, START_RUNLEVELS, STOP_RUNLEVELS, config_path, runlevel_links};
pub use shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use template::{
    Placeholder, SYSTEM_V_TEMPLATE, SYSTEMD_TEMPLATE, ScriptTemplate, ServiceConfigRecord,
    UPSTART_TEMPLATE, template,
};

#[cfg(test)]
mod tests;
