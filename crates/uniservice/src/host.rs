//! Facts about the running process that the lifecycle depends on.

use std::env;
use std::io;
use std::path::PathBuf;

use nix::unistd::{Pid, getppid};

/// Resolves the absolute path of the executable an init file should launch.
pub trait ExecutableLocator: Send + Sync {
    /// Returns the absolute executable path.
    fn locate(&self) -> io::Result<PathBuf>;
}

/// Locates the currently running executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentExecutable;

impl ExecutableLocator for CurrentExecutable {
    fn locate(&self) -> io::Result<PathBuf> {
        env::current_exe()
    }
}

/// Reports whether the process was started from a terminal session rather
/// than by the init system, which always appears as parent PID 1.
#[must_use]
pub fn is_interactive() -> bool {
    getppid() != Pid::from_raw(1)
}
