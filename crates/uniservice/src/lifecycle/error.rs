//! Defines the error surface of lifecycle operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::command::CommandError;
use crate::shutdown::ShutdownError;

use super::HandlerError;

/// Errors surfaced by [`Service`](super::Service) operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The control file already exists.
    #[error("init file already exists: {}", .path.display())]
    AlreadyInstalled {
        /// Existing control file.
        path: PathBuf,
    },
    /// The executable path for the generated file could not be determined.
    #[error("failed to resolve service executable path: {source}")]
    ExecutablePath {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Creating the control file failed.
    #[error("failed to create '{}': {source}", .path.display())]
    CreateConfig {
        /// Control file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing the rendered template failed.
    #[error("failed to write '{}': {source}", .path.display())]
    WriteConfig {
        /// Control file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Setting permissions on the control file failed.
    #[error("failed to set permissions on '{}': {source}", .path.display())]
    SetPermissions {
        /// Control file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Deleting the control file failed.
    #[error("failed to remove '{}': {source}", .path.display())]
    RemoveConfig {
        /// Control file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// An init-system control command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The handler's start hook failed.
    #[error("service start hook failed: {source}")]
    HandlerStart {
        /// Error returned by the handler.
        #[source]
        source: HandlerError,
    },
    /// The handler's stop hook failed.
    #[error("service stop hook failed: {source}")]
    HandlerStop {
        /// Error returned by the handler.
        #[source]
        source: HandlerError,
    },
    /// Waiting for the shutdown signal failed.
    #[error("failed to await shutdown signal: {source}")]
    Shutdown {
        /// Underlying shutdown error.
        #[source]
        source: ShutdownError,
    },
}

impl From<ShutdownError> for ServiceError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}
