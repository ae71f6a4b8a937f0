//! Entry point for the `uniservice` binary.
//!
//! Operators invoke it with a lifecycle verb; the init system launches the
//! installed copy without one, which runs the service in the foreground.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    uniservice_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
