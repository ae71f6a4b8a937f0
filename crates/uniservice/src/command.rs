//! Invocation of the host's service-control executables.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use strum::Display;
use thiserror::Error;
use tracing::debug;

use crate::flavor::InitFlavor;

pub(crate) const COMMAND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::command");

/// Action forwarded to the init system's control tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    /// Start the service.
    Start,
    /// Stop the service.
    Stop,
}

/// A fully specified control command such as `systemctl start app.service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    program: &'static str,
    args: Vec<String>,
}

impl ServiceCommand {
    /// Builds a command from its program and arguments.
    #[must_use]
    pub fn new(program: &'static str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program,
            args: args.into_iter().collect(),
        }
    }

    /// `systemctl daemon-reload`
    #[must_use]
    pub fn daemon_reload() -> Self {
        Self::new("systemctl", ["daemon-reload".to_owned()])
    }

    /// `systemctl disable <name>.service`
    #[must_use]
    pub fn disable(name: &str) -> Self {
        Self::new("systemctl", ["disable".to_owned(), unit_name(name)])
    }

    /// Start or stop command appropriate for `flavor`.
    #[must_use]
    pub fn control(flavor: InitFlavor, action: ControlAction, name: &str) -> Self {
        let action = action.to_string();
        match flavor {
            InitFlavor::Systemd => Self::new("systemctl", [action, unit_name(name)]),
            InitFlavor::Upstart => Self::new("initctl", [action, name.to_owned()]),
            InitFlavor::SystemV => Self::new("service", [name.to_owned(), action]),
        }
    }

    /// Executable name.
    #[must_use]
    pub const fn program(&self) -> &'static str {
        self.program
    }

    /// Arguments passed to the executable.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.program)?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}

fn unit_name(name: &str) -> String {
    format!("{name}.service")
}

/// Errors reported while running a control command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The executable could not be spawned.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        /// Rendered command line.
        command: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The executable ran but reported failure.
    #[error("'{command}' {}{}", exit_description(.code), stderr_suffix(.stderr))]
    Failed {
        /// Rendered command line.
        command: String,
        /// Exit code, absent when the process was killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_owned(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Seam over process execution so lifecycle logic can be tested without
/// touching the host init system.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion, succeeding only on a zero exit status.
    fn run(&self, command: &ServiceCommand) -> Result<(), CommandError>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Builds a new system runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &ServiceCommand) -> Result<(), CommandError> {
        debug!(
            target: COMMAND_TARGET,
            command = %command,
            "running service control command"
        );
        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Launch {
                command: command.to_string(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        debug!(
            target: COMMAND_TARGET,
            command = %command,
            code = ?output.status.code(),
            stderr = %stderr,
            "service control command failed"
        );
        Err(CommandError::Failed {
            command: command.to_string(),
            code: output.status.code(),
            stderr,
        })
    }
}
