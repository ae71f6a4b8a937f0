//! Command-line argument definitions.
//!
//! Configuration flags are consumed by the `OrthoConfig` loader before clap
//! sees the remaining tokens, so [`Cli`] only describes the lifecycle verb.

use clap::{Parser, Subcommand};

/// Flags routed to the configuration loader. They must precede the verb.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--name",
    "--display-name",
    "--description",
    "--root",
    "--log-filter",
    "--log-format",
];

const CONFIG_HELP: &str = "\
Configuration (before the verb; each flag also reads UNISERVICE_<FLAG>):
  --config-path <PATH>    TOML file [default: /etc/uniservice/uniservice.toml if present]
  --name <NAME>           service name used in init-system paths and commands
  --display-name <TEXT>   human-readable service name
  --description <TEXT>    description written into the generated file
  --root <DIR>            filesystem root holding the init-system directories
  --log-filter <FILTER>   tracing filter expression [default: info]
  --log-format <FORMAT>   json or compact [default: json]";

/// Manages this program as a System-V, Upstart or systemd service.
#[derive(Parser, Debug)]
#[command(
    name = "uniservice",
    version,
    disable_help_subcommand = true,
    after_help = CONFIG_HELP
)]
pub(crate) struct Cli {
    /// Lifecycle verb; the service runs in the foreground when omitted.
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

impl Cli {
    /// Lifecycle verb to execute.
    pub(crate) fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}

/// Lifecycle verbs.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Writes the init-system configuration for this executable.
    Install,
    /// Deletes the init-system configuration.
    Remove,
    /// Starts the installed service through the init system.
    Start,
    /// Stops the installed service through the init system.
    Stop,
    /// Stops then starts the installed service.
    Restart,
    /// Runs the service in the foreground until interrupted.
    Run,
}

impl Command {
    /// Verb used in progress and error messages.
    pub(crate) const fn verb(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Remove => "remove",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Run => "run",
        }
    }
}
