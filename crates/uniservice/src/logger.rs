//! Message sinks handed to service handlers.
//!
//! Interactive sessions log to the console; services launched by the init
//! system log to the local syslog daemon.

use std::io::{self, Write};
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::process;

use thiserror::Error;

/// Socket served by the local syslog daemon.
pub const SYSLOG_SOCKET: &str = "/dev/log";

// RFC 3164 facility code for system daemons.
const FACILITY_DAEMON: u8 = 3;

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error conditions.
    Error,
    /// Warning conditions.
    Warning,
    /// Informational messages.
    Info,
}

impl Severity {
    const fn syslog_code(self) -> u8 {
        match self {
            Self::Error => 3,
            Self::Warning => 4,
            Self::Info => 6,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Errors raised while opening or writing to a log sink.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The syslog socket could not be reached.
    #[error("failed to connect to system log at '{}': {source}", .path.display())]
    Connect {
        /// Socket path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing a message failed.
    #[error("failed to write log message: {source}")]
    Write {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Minimal logging interface offered to service handlers.
pub trait Logger: Send + Sync {
    /// Writes a message at `severity`.
    fn log(&self, severity: Severity, message: &str) -> Result<(), LoggerError>;

    /// Logs an error.
    fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Error, message)
    }

    /// Logs a warning.
    fn warning(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Warning, message)
    }

    /// Logs an informational message.
    fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Info, message)
    }
}

/// Writes `<severity>: <message>` lines to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, severity: Severity, message: &str) -> Result<(), LoggerError> {
        write_console_line(&mut io::stderr().lock(), severity, message)
    }
}

fn write_console_line(
    writer: &mut impl Write,
    severity: Severity,
    message: &str,
) -> Result<(), LoggerError> {
    writeln!(writer, "{}: {message}", severity.label())
        .and_then(|()| writer.flush())
        .map_err(|source| LoggerError::Write { source })
}

/// Sends RFC 3164 datagrams to the local syslog daemon.
#[derive(Debug)]
pub struct SyslogLogger {
    socket: UnixDatagram,
    tag: String,
    pid: u32,
}

impl SyslogLogger {
    /// Connects to [`SYSLOG_SOCKET`], tagging messages with `tag`.
    pub fn connect(tag: &str) -> Result<Self, LoggerError> {
        Self::connect_to(Path::new(SYSLOG_SOCKET), tag)
    }

    /// Connects to the syslog socket at `path`.
    pub fn connect_to(path: &Path, tag: &str) -> Result<Self, LoggerError> {
        let connect_error = |source| LoggerError::Connect {
            path: path.to_path_buf(),
            source,
        };
        let socket = UnixDatagram::unbound().map_err(connect_error)?;
        socket.connect(path).map_err(connect_error)?;
        Ok(Self {
            socket,
            tag: tag.to_owned(),
            pid: process::id(),
        })
    }
}

impl Logger for SyslogLogger {
    fn log(&self, severity: Severity, message: &str) -> Result<(), LoggerError> {
        let datagram = format_syslog_message(severity, &self.tag, self.pid, message);
        self.socket
            .send(datagram.as_bytes())
            .map(|_| ())
            .map_err(|source| LoggerError::Write { source })
    }
}

fn format_syslog_message(severity: Severity, tag: &str, pid: u32, message: &str) -> String {
    let priority = u16::from(FACILITY_DAEMON) * 8 + u16::from(severity.syslog_code());
    format!("<{priority}>{tag}[{pid}]: {message}")
}
