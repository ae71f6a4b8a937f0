use std::path::PathBuf;

use crate::LogFormat;

/// Service name used when no configuration layer supplies one.
pub const DEFAULT_SERVICE_NAME: &str = "uniservice";

/// `tracing` filter applied when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration file read when neither `--config-path` nor
/// `UNISERVICE_CONFIG_PATH` names one. `install` writes the service identity
/// here so the init system's bare invocation resolves the same service.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/uniservice/uniservice.toml";

/// Filesystem root of a live host.
pub const DEFAULT_ROOT: &str = "/";

/// Owned form of [`DEFAULT_SERVICE_NAME`].
#[must_use]
pub fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_owned()
}

/// Owned form of [`DEFAULT_LOG_FILTER`].
#[must_use]
pub fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Structured output unless configured otherwise.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned form of [`DEFAULT_ROOT`].
#[must_use]
pub fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}
