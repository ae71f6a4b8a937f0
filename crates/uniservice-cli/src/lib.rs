//! Command-line runtime for the `uniservice` binary.
//!
//! Leading configuration flags are resolved by `uniservice-config`; the
//! remaining tokens select one lifecycle verb, which runs against a
//! [`uniservice::Service`] inside its telemetry span. The runtime writes to
//! caller-supplied streams so tests can drive it in process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use uniservice::{RunlevelLinkError, Service, ServiceDescriptor, telemetry};
use uniservice_config::Config;

mod cli;
mod config;
mod errors;
mod handler;
mod identity;

use cli::{Cli, Command};
use config::split_arguments;
use errors::AppError;
use handler::LoggingHandler;
use identity::IdentityFile;

pub(crate) const CLI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::cli");

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    match try_run(args, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            report(stdout, &error.render().to_string());
            ExitCode::SUCCESS
        }
        Err(error) => {
            report(stderr, &format!("{error}\n"));
            ExitCode::FAILURE
        }
    }
}

fn report(stream: &mut impl Write, message: &str) {
    if let Err(error) = stream.write_all(message.as_bytes()) {
        warn!(target: CLI_TARGET, %error, "failed to write to the terminal");
    }
}

fn try_run<I, W>(args: I, stdout: &mut W) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
{
    let split = split_arguments(args);
    let cli = Cli::try_parse_from(split.command).map_err(AppError::CliUsage)?;
    let config = Config::resolve_from_iter(split.config)?;
    telemetry::initialise(&config)?;

    let service = Service::builder(ServiceDescriptor::from(&config), LoggingHandler)
        .root(config.root.clone())
        .build();
    let command = cli.command();
    let _span = telemetry::service_span(&service).entered();
    debug!(target: CLI_TARGET, verb = command.verb(), "dispatching lifecycle command");
    execute(command, &config, &service, stdout)
}

fn execute<W: Write>(
    command: Command,
    config: &Config,
    service: &Service,
    stdout: &mut W,
) -> Result<(), AppError> {
    let lifecycle = |source| AppError::Lifecycle {
        verb: command.verb(),
        source,
    };
    match command {
        Command::Install => {
            let report = service.install().map_err(lifecycle)?;
            writeln!(
                stdout,
                "installed {service} at {}",
                report.config_path().display()
            )?;
            write_link_warnings(stdout, report.link_warnings())?;
            match identity::record(config)? {
                IdentityFile::Written(path) => {
                    writeln!(stdout, "recorded service identity in {}", path.display())?;
                }
                IdentityFile::Unchanged(_) => {}
                IdentityFile::Kept(path) => writeln!(
                    stdout,
                    "warning: kept existing {}; the installed service reads its name from it",
                    path.display()
                )?,
            }
        }
        Command::Remove => {
            let report = service.remove().map_err(lifecycle)?;
            writeln!(
                stdout,
                "removed {service} from {}",
                report.config_path().display()
            )?;
            write_link_warnings(stdout, report.link_warnings())?;
        }
        Command::Start => {
            service.start().map_err(lifecycle)?;
            writeln!(stdout, "started {service}")?;
        }
        Command::Stop => {
            service.stop().map_err(lifecycle)?;
            writeln!(stdout, "stopped {service}")?;
        }
        Command::Restart => {
            service.restart().map_err(lifecycle)?;
            writeln!(stdout, "restarted {service}")?;
        }
        Command::Run => service.run().map_err(lifecycle)?,
    }
    Ok(())
}

fn write_link_warnings<W: Write>(
    stdout: &mut W,
    warnings: &[RunlevelLinkError],
) -> Result<(), AppError> {
    for warning in warnings {
        writeln!(stdout, "warning: {warning}")?;
    }
    Ok(())
}
