//! Canonical locations of per-flavor control files.

use std::path::{Path, PathBuf};

use crate::flavor::InitFlavor;

/// Runlevels whose `rc<N>.d` directory receives a start link.
pub const START_RUNLEVELS: [u8; 4] = [2, 3, 4, 5];

/// Runlevels whose `rc<N>.d` directory receives a kill link.
pub const STOP_RUNLEVELS: [u8; 3] = [0, 1, 6];

const START_PRIORITY: &str = "S50";
const STOP_PRIORITY: &str = "K02";

/// Location and permission bits of a service's init-system file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    path: PathBuf,
    mode: u32,
}

impl ConfigPath {
    /// Absolute path as seen by the init system.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unix permission bits the file is created with.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }
}

impl InitFlavor {
    /// Resolves where this flavor expects the file for `name`.
    #[must_use]
    pub fn config_path(self, name: &str) -> ConfigPath {
        let (path, mode) = match self {
            Self::Systemd => (format!("/etc/systemd/system/{name}.service"), 0o644),
            Self::SystemV => (format!("/etc/init.d/{name}"), 0o755),
            Self::Upstart => (format!("/etc/init/{name}.conf"), 0o644),
        };
        ConfigPath {
            path: PathBuf::from(path),
            mode,
        }
    }
}

/// Free-function form of [`InitFlavor::config_path`].
#[must_use]
pub fn config_path(flavor: InitFlavor, name: &str) -> ConfigPath {
    flavor.config_path(name)
}

/// A System-V `rc<N>.d` entry pointing at the init script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunlevelLink {
    runlevel: u8,
    path: PathBuf,
}

impl RunlevelLink {
    /// Runlevel the link belongs to.
    #[must_use]
    pub const fn runlevel(&self) -> u8 {
        self.runlevel
    }

    /// Absolute path of the link itself.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Start links for runlevels 2-5 followed by kill links for 0, 1 and 6.
#[must_use]
pub fn runlevel_links(name: &str) -> Vec<RunlevelLink> {
    let starts = START_RUNLEVELS
        .iter()
        .map(|&runlevel| (runlevel, START_PRIORITY));
    let stops = STOP_RUNLEVELS
        .iter()
        .map(|&runlevel| (runlevel, STOP_PRIORITY));
    starts
        .chain(stops)
        .map(|(runlevel, priority)| RunlevelLink {
            runlevel,
            path: PathBuf::from(format!("/etc/rc{runlevel}.d/{priority}{name}")),
        })
        .collect()
}

/// Re-anchors an absolute host path beneath `root`.
pub(crate) fn under_root(root: &Path, absolute: impl AsRef<Path>) -> PathBuf {
    let absolute = absolute.as_ref();
    let relative = absolute.strip_prefix("/").unwrap_or(absolute);
    root.join(relative)
}
