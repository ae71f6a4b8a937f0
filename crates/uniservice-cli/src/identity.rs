//! Records the resolved service identity for the init system's launch.
//!
//! The generated control files start the executable without arguments, so
//! the installed process reads its name and logging settings back from
//! [`DEFAULT_CONFIG_PATH`] under the install root.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use uniservice_config::{Config, DEFAULT_CONFIG_PATH, LogFormat};

use crate::errors::AppError;

/// Outcome of recording the identity file.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum IdentityFile {
    /// A new file was written.
    Written(PathBuf),
    /// The file already held this identity.
    Unchanged(PathBuf),
    /// A file with different contents was left in place.
    Kept(PathBuf),
}

#[derive(Serialize)]
struct InstalledConfig<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    description: &'a str,
    log_filter: &'a str,
    log_format: LogFormat,
}

/// Writes the identity from `config` unless a file is already present.
pub(crate) fn record(config: &Config) -> Result<IdentityFile, AppError> {
    let path = config
        .root
        .join(DEFAULT_CONFIG_PATH.trim_start_matches('/'));
    let contents = toml::to_string(&InstalledConfig {
        name: &config.name,
        display_name: config.display_name.as_deref(),
        description: &config.description,
        log_filter: config.log_filter(),
        log_format: config.log_format(),
    })?;
    let identity_error = |source: io::Error| AppError::Identity {
        path: path.clone(),
        source,
    };

    match fs::read_to_string(&path) {
        Ok(existing) if existing == contents => return Ok(IdentityFile::Unchanged(path)),
        Ok(_) => return Ok(IdentityFile::Kept(path)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(identity_error(error)),
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(identity_error)?;
    }
    fs::write(&path, contents).map_err(identity_error)?;
    Ok(IdentityFile::Written(path))
}
