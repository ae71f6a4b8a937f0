//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uniservice::{ServiceError, TelemetryError};
use uniservice_config::ConfigError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(#[from] ConfigError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("{verb} failed: {source}")]
    Lifecycle {
        verb: &'static str,
        #[source]
        source: ServiceError,
    },
    #[error("failed to serialise service identity: {0}")]
    SerialiseIdentity(#[from] toml::ser::Error),
    #[error("failed to record service identity in '{}': {source}", .path.display())]
    Identity {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
