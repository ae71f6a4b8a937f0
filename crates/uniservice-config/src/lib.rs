//! Layered configuration for the uniservice workspace.
//!
//! [`Config`] derives `OrthoConfig`, which merges built-in defaults, a TOML
//! file (`--config-path` or `UNISERVICE_CONFIG_PATH`), `UNISERVICE_*`
//! environment variables and command-line flags, in that order of
//! precedence. [`Config::resolve_from_iter`] adds the host-wide file at
//! [`DEFAULT_CONFIG_PATH`] when no file was named, then validates the service
//! name before it reaches any init-system path.

mod defaults;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER, DEFAULT_ROOT, DEFAULT_SERVICE_NAME,
    default_log_filter, default_log_format, default_root, default_service_name,
};

/// Flag naming an explicit configuration file.
pub const CONFIG_PATH_FLAG: &str = "--config-path";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "UNISERVICE_CONFIG_PATH";

/// How the binaries render their own log events.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, for journald or a log shipper.
    #[default]
    Json,
    /// Single-line text for operators at a terminal.
    Compact,
}

/// Resolved service identity and runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "UNISERVICE")]
pub struct Config {
    /// Identifier used in init-system paths and control commands.
    #[ortho_config(default = default_service_name())]
    pub name: String,
    /// Human-readable label; the name is shown when absent.
    pub display_name: Option<String>,
    /// Free text written into generated init scripts.
    #[ortho_config(default = String::new())]
    pub description: String,
    /// Filesystem root under which init-system files are resolved.
    #[ortho_config(default = default_root())]
    pub root: PathBuf,
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter())]
    pub log_filter: String,
    /// Output format for the binaries' log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            display_name: None,
            description: String::new(),
            root: default_root(),
            log_filter: default_log_filter(),
            log_format: default_log_format(),
        }
    }
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read, parsed or merged.
    #[error(transparent)]
    Load(#[from] Arc<OrthoError>),
    /// The resolved service name cannot be used in init-system paths.
    #[error("invalid service name '{name}': {reason}")]
    InvalidServiceName {
        /// Offending name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
}

impl Config {
    /// Loads every layer from `args` (program name first) and the process
    /// environment, falling back to [`DEFAULT_CONFIG_PATH`] when it exists
    /// and no file was named.
    pub fn resolve_from_iter<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::resolve_with_fallback(args, Path::new(DEFAULT_CONFIG_PATH))
    }

    /// As [`Config::resolve_from_iter`] with an alternate fallback file.
    pub fn resolve_with_fallback<I>(args: I, fallback: &Path) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().collect();
        if !names_config_file(&args) && fallback.is_file() {
            args.push(OsString::from(CONFIG_PATH_FLAG));
            args.push(fallback.as_os_str().to_owned());
        }
        let config = Self::load_from_iter(args)?;
        validate_service_name(&config.name)?;
        Ok(config)
    }

    /// Filter expression used to initialise telemetry.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

fn names_config_file(args: &[OsString]) -> bool {
    std::env::var_os(CONFIG_PATH_ENV).is_some()
        || args.iter().any(|arg| {
            arg.to_str().is_some_and(|text| {
                text == CONFIG_PATH_FLAG
                    || text
                        .strip_prefix(CONFIG_PATH_FLAG)
                        .is_some_and(|rest| rest.starts_with('='))
            })
        })
}

/// Rejects names that would escape the init-system directories or break the
/// generated control commands.
pub fn validate_service_name(name: &str) -> Result<(), ConfigError> {
    let reject = |reason| {
        Err(ConfigError::InvalidServiceName {
            name: name.to_owned(),
            reason,
        })
    };
    if name.is_empty() {
        return reject("name must not be empty");
    }
    if name == "." || name == ".." {
        return reject("name must not be a relative path component");
    }
    if name.contains('/') {
        return reject("name must not contain '/'");
    }
    if name.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return reject("name must not contain whitespace or control characters");
    }
    Ok(())
}
