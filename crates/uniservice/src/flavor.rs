//! Init-system detection.
//!
//! The host is classified by checking filesystem markers beneath a root
//! directory. systemd is checked first because hybrid hosts can carry the
//! Upstart bridge binary alongside a running systemd, and systemd must win.

use std::fmt;
use std::path::Path;

use strum::{Display, EnumIter};
use tracing::debug;

use crate::paths::under_root;

const DETECT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::flavor");

/// Runtime directory present only while systemd is PID 1.
pub const SYSTEMD_MARKER: &str = "/run/systemd/system";

/// Binary shipped exclusively by Upstart.
pub const UPSTART_MARKER: &str = "/sbin/upstart-udev-bridge";

/// Init system variant managing services on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum InitFlavor {
    /// Classic `/etc/init.d` scripts driven by runlevel links.
    #[strum(serialize = "System-V")]
    SystemV,
    /// Event-based `/etc/init` job definitions.
    #[strum(serialize = "Upstart")]
    Upstart,
    /// Unit files under `/etc/systemd/system`.
    #[strum(serialize = "systemd")]
    Systemd,
}

impl InitFlavor {
    /// Checks `root` for init-system markers.
    ///
    /// Falls back to [`InitFlavor::SystemV`] when no marker is found; the
    /// check itself cannot fail.
    #[must_use]
    pub fn detect(root: &Path) -> Self {
        let flavor = if under_root(root, SYSTEMD_MARKER).exists() {
            Self::Systemd
        } else if under_root(root, UPSTART_MARKER).exists() {
            Self::Upstart
        } else {
            Self::SystemV
        };
        debug!(
            target: DETECT_TARGET,
            root = %root.display(),
            %flavor,
            "detected init system"
        );
        flavor
    }
}

/// Convenience wrapper around [`InitFlavor::detect`].
#[must_use]
pub fn detect_flavor(root: &Path) -> InitFlavor {
    InitFlavor::detect(root)
}

/// Describes the host operating system for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSystem {
    flavor: InitFlavor,
}

impl HostSystem {
    /// Wraps a detected flavor.
    #[must_use]
    pub const fn new(flavor: InitFlavor) -> Self {
        Self { flavor }
    }

    /// Init system in use.
    #[must_use]
    pub const fn flavor(self) -> InitFlavor {
        self.flavor
    }
}

impl fmt::Display for HostSystem {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Linux {}", self.flavor)
    }
}
