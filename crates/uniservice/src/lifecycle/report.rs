use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A runlevel link that could not be created or removed.
#[derive(Debug, Error)]
#[error(
    "runlevel link '{}' -> '{}': {source}",
    .link.display(),
    .target.display()
)]
pub struct RunlevelLinkError {
    /// Link path.
    pub link: PathBuf,
    /// Init script the link points at.
    pub target: PathBuf,
    /// Underlying IO error.
    #[source]
    pub source: io::Error,
}

/// Outcome of a successful install.
#[derive(Debug)]
pub struct InstallReport {
    config_path: PathBuf,
    link_warnings: Vec<RunlevelLinkError>,
}

impl InstallReport {
    pub(super) const fn new(config_path: PathBuf, link_warnings: Vec<RunlevelLinkError>) -> Self {
        Self {
            config_path,
            link_warnings,
        }
    }

    /// Control file that was written.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Runlevel links that could not be created. Always empty outside
    /// System-V.
    #[must_use]
    pub fn link_warnings(&self) -> &[RunlevelLinkError] {
        &self.link_warnings
    }
}

/// Outcome of a successful remove.
#[derive(Debug)]
pub struct RemoveReport {
    config_path: PathBuf,
    link_warnings: Vec<RunlevelLinkError>,
}

impl RemoveReport {
    pub(super) const fn new(config_path: PathBuf, link_warnings: Vec<RunlevelLinkError>) -> Self {
        Self {
            config_path,
            link_warnings,
        }
    }

    /// Control file that was deleted.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Runlevel links that were present but could not be deleted.
    #[must_use]
    pub fn link_warnings(&self) -> &[RunlevelLinkError] {
        &self.link_warnings
    }
}
