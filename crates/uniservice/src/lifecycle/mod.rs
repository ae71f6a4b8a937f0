//! The service lifecycle controller.
//!
//! A [`Service`] binds a [`ServiceDescriptor`], the caller's
//! [`ServiceHandler`] and the facts detected about the host when it was built:
//! the init flavor and whether the process is interactive. Neither is
//! re-evaluated afterwards. Installed and running state live entirely in the
//! host: a service is installed while its control file exists and running
//! while the init system says so.
//!
//! - [`install`](Service::install) / [`remove`](Service::remove) manage the
//!   control file (and System-V runlevel links).
//! - [`start`](Service::start) / [`stop`](Service::stop) /
//!   [`restart`](Service::restart) delegate to the init system's tool.
//! - [`run`](Service::run) hosts the handler in the foreground until an
//!   interrupt or termination signal arrives.

mod control;
mod error;
mod install;
mod report;
mod run;

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::descriptor::ServiceDescriptor;
use crate::flavor::{HostSystem, InitFlavor};
use crate::host::{CurrentExecutable, ExecutableLocator, is_interactive};
use crate::logger::{ConsoleLogger, Logger, LoggerError, SyslogLogger};
use crate::paths::under_root;

pub use error::ServiceError;
pub use report::{InstallReport, RemoveReport, RunlevelLinkError};

pub(crate) const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Pause between stop and start during a restart, giving the init system time
/// to release the old process.
pub const RESTART_DELAY: Duration = Duration::from_millis(50);

/// Error type returned by handler hooks.
pub type HandlerError = Box<dyn StdError + Send + Sync>;

/// Business logic hosted by [`Service::run`].
pub trait ServiceHandler: Send + Sync {
    /// Starts the work. Must not block; long-running work belongs on its own
    /// thread.
    fn start(&self, service: &Service) -> Result<(), HandlerError>;

    /// Stops the work started by [`ServiceHandler::start`].
    fn stop(&self, service: &Service) -> Result<(), HandlerError>;
}

/// A service bound to the host it runs on.
pub struct Service {
    descriptor: ServiceDescriptor,
    handler: Box<dyn ServiceHandler>,
    flavor: InitFlavor,
    root: PathBuf,
    interactive: bool,
    runner: Box<dyn CommandRunner>,
    locator: Box<dyn ExecutableLocator>,
    restart_delay: Duration,
}

impl Service {
    /// Builds a service for the live host using the production
    /// collaborators.
    #[must_use]
    pub fn new(descriptor: ServiceDescriptor, handler: impl ServiceHandler + 'static) -> Self {
        Self::builder(descriptor, handler).build()
    }

    /// Starts a builder for injecting collaborators.
    #[must_use]
    pub fn builder(
        descriptor: ServiceDescriptor,
        handler: impl ServiceHandler + 'static,
    ) -> ServiceBuilder {
        ServiceBuilder::new(descriptor, Box::new(handler))
    }

    /// Identity of the service.
    #[must_use]
    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// Init system detected when the service was built.
    #[must_use]
    pub const fn flavor(&self) -> InitFlavor {
        self.flavor
    }

    /// Host description such as `Linux systemd`.
    #[must_use]
    pub const fn host_system(&self) -> HostSystem {
        HostSystem::new(self.flavor)
    }

    /// Filesystem root init-system paths are resolved under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the process was launched from a terminal rather than by the
    /// init system.
    #[must_use]
    pub const fn interactive(&self) -> bool {
        self.interactive
    }

    /// Path of the control file on this host, including the root prefix.
    #[must_use]
    pub fn installed_path(&self) -> PathBuf {
        self.host_path(self.flavor.config_path(self.descriptor.name()).path())
    }

    /// Console logger for interactive sessions, the system log otherwise.
    pub fn logger(&self) -> Result<Box<dyn Logger>, LoggerError> {
        if self.interactive {
            return Ok(Box::new(ConsoleLogger));
        }
        self.system_logger()
    }

    /// Logger writing to the system log regardless of how the process was
    /// launched.
    pub fn system_logger(&self) -> Result<Box<dyn Logger>, LoggerError> {
        Ok(Box::new(SyslogLogger::connect(self.descriptor.name())?))
    }

    fn host_path(&self, absolute: &Path) -> PathBuf {
        under_root(&self.root, absolute)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.descriptor, formatter)
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Service")
            .field("descriptor", &self.descriptor)
            .field("flavor", &self.flavor)
            .field("root", &self.root)
            .field("interactive", &self.interactive)
            .field("restart_delay", &self.restart_delay)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Service`] with substitutable collaborators.
pub struct ServiceBuilder {
    descriptor: ServiceDescriptor,
    handler: Box<dyn ServiceHandler>,
    root: PathBuf,
    flavor: Option<InitFlavor>,
    interactive: Option<bool>,
    runner: Box<dyn CommandRunner>,
    locator: Box<dyn ExecutableLocator>,
    restart_delay: Duration,
}

impl ServiceBuilder {
    fn new(descriptor: ServiceDescriptor, handler: Box<dyn ServiceHandler>) -> Self {
        Self {
            descriptor,
            handler,
            root: PathBuf::from("/"),
            flavor: None,
            interactive: None,
            runner: Box::new(SystemCommandRunner::new()),
            locator: Box::new(CurrentExecutable),
            restart_delay: RESTART_DELAY,
        }
    }

    /// Resolves detection markers and control files beneath `root`.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Skips detection and uses `flavor`.
    #[must_use]
    pub const fn flavor(mut self, flavor: InitFlavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Overrides parent-process based interactivity detection.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Replaces the runner used for `systemctl`, `initctl` and `service`.
    #[must_use]
    pub fn command_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replaces executable path resolution.
    #[must_use]
    pub fn executable_locator(mut self, locator: impl ExecutableLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Replaces [`RESTART_DELAY`].
    #[must_use]
    pub const fn restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Detects anything not supplied explicitly and builds the service.
    #[must_use]
    pub fn build(self) -> Service {
        let flavor = self
            .flavor
            .unwrap_or_else(|| InitFlavor::detect(&self.root));
        let interactive = self.interactive.unwrap_or_else(is_interactive);
        debug!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            %flavor,
            interactive,
            "service constructed"
        );
        Service {
            descriptor: self.descriptor,
            handler: self.handler,
            flavor,
            root: self.root,
            interactive,
            runner: self.runner,
            locator: self.locator,
            restart_delay: self.restart_delay,
        }
    }
}
