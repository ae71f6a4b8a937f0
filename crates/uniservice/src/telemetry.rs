//! `tracing` setup for binaries that manage a [`Service`].
//!
//! [`initialise`] installs the process-wide subscriber once, rendering events
//! as JSON or compact text on stderr. [`service_span`] opens the span under
//! which a lifecycle verb runs, so every event it emits carries the service
//! name, the init flavor and whether the process is interactive.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Span, Subscriber, info_span, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use uniservice_config::{Config, LogFormat};

use crate::Service;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another subscriber was already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use; later calls are no-ops.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let subscriber = build_subscriber(config, io::stderr, io::stderr().is_terminal())?;
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
        })
        .map(|()| TelemetryHandle)
}

/// Span carrying the identity of `service` for the events of one verb.
#[must_use]
pub fn service_span(service: &Service) -> Span {
    info_span!(
        target: crate::lifecycle::LIFECYCLE_TARGET,
        "service",
        service = service.descriptor().name(),
        flavor = %service.flavor(),
        interactive = service.interactive(),
    )
}

fn build_subscriber<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.with_ansi(ansi).compact().finish()),
    })
}
