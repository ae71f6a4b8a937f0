//! Writing and deleting init-system control files.

use std::fs::{self, OpenOptions, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::command::ServiceCommand;
use crate::flavor::InitFlavor;
use crate::paths::runlevel_links;
use crate::template::ServiceConfigRecord;

use super::{
    InstallReport, LIFECYCLE_TARGET, RemoveReport, RunlevelLinkError, Service, ServiceError,
};

impl Service {
    /// Writes the control file for the detected init system.
    ///
    /// Fails with [`ServiceError::AlreadyInstalled`] when the file exists.
    /// On System-V the script is made executable and linked into the
    /// runlevel directories; links that cannot be created are reported in
    /// the returned [`InstallReport`] rather than failing the install. On
    /// systemd the manager configuration is reloaded and a reload failure is
    /// the install error.
    pub fn install(&self) -> Result<InstallReport, ServiceError> {
        let config = self.flavor.config_path(self.descriptor.name());
        let path = self.host_path(config.path());
        if fs::symlink_metadata(&path).is_ok() {
            return Err(ServiceError::AlreadyInstalled { path });
        }

        let record = self.config_record()?;
        let contents = self.flavor.template().render(&record);
        write_exclusive(&path, config.mode(), &contents)?;
        debug!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            file = %path.display(),
            executable = %record.path,
            "control file written"
        );

        let mut link_warnings = Vec::new();
        match self.flavor {
            InitFlavor::SystemV => {
                fs::set_permissions(&path, Permissions::from_mode(config.mode())).map_err(
                    |source| ServiceError::SetPermissions {
                        path: path.clone(),
                        source,
                    },
                )?;
                link_warnings = self.link_runlevels(config.path());
            }
            InitFlavor::Systemd => self.runner.run(&ServiceCommand::daemon_reload())?,
            InitFlavor::Upstart => {}
        }

        info!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            flavor = %self.flavor,
            file = %path.display(),
            link_warnings = link_warnings.len(),
            "service installed"
        );
        Ok(InstallReport::new(path, link_warnings))
    }

    /// Deletes the control file.
    ///
    /// On systemd the unit is disabled first; that step is best-effort since
    /// the unit may already be stopped or disabled. On System-V the runlevel
    /// links created by [`Service::install`] are removed as well, with
    /// failures reported in the returned [`RemoveReport`].
    pub fn remove(&self) -> Result<RemoveReport, ServiceError> {
        if self.flavor == InitFlavor::Systemd {
            if let Err(error) = self.runner.run(&ServiceCommand::disable(self.descriptor.name())) {
                debug!(
                    target: LIFECYCLE_TARGET,
                    service = self.descriptor.name(),
                    error = %error,
                    "ignoring failure to disable unit"
                );
            }
        }

        let config = self.flavor.config_path(self.descriptor.name());
        let path = self.host_path(config.path());
        fs::remove_file(&path).map_err(|source| ServiceError::RemoveConfig {
            path: path.clone(),
            source,
        })?;

        let link_warnings = if self.flavor == InitFlavor::SystemV {
            self.unlink_runlevels(config.path())
        } else {
            Vec::new()
        };

        info!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            flavor = %self.flavor,
            file = %path.display(),
            link_warnings = link_warnings.len(),
            "service removed"
        );
        Ok(RemoveReport::new(path, link_warnings))
    }

    fn config_record(&self) -> Result<ServiceConfigRecord, ServiceError> {
        let executable = self
            .locator
            .locate()
            .map_err(|source| ServiceError::ExecutablePath { source })?;
        let Some(executable) = executable.to_str() else {
            return Err(ServiceError::ExecutablePath {
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("executable path {} is not valid UTF-8", executable.display()),
                ),
            });
        };
        Ok(ServiceConfigRecord {
            display: self.descriptor.display_name().to_owned(),
            description: self.descriptor.description().to_owned(),
            path: executable.to_owned(),
        })
    }

    fn link_runlevels(&self, script: &Path) -> Vec<RunlevelLinkError> {
        runlevel_links(self.descriptor.name())
            .into_iter()
            .filter_map(|link| {
                let location = self.host_path(link.path());
                symlink(script, &location)
                    .err()
                    .map(|source| self.link_warning(location, script, source, "create"))
            })
            .collect()
    }

    fn unlink_runlevels(&self, script: &Path) -> Vec<RunlevelLinkError> {
        runlevel_links(self.descriptor.name())
            .into_iter()
            .filter_map(|link| {
                let location = self.host_path(link.path());
                match fs::read_link(&location) {
                    Ok(target) if target == script => fs::remove_file(&location)
                        .err()
                        .map(|source| self.link_warning(location, script, source, "remove")),
                    Ok(_) => {
                        debug!(
                            target: LIFECYCLE_TARGET,
                            link = %location.display(),
                            "leaving runlevel link that points elsewhere"
                        );
                        None
                    }
                    Err(error) if error.kind() == io::ErrorKind::NotFound => None,
                    Err(source) => Some(self.link_warning(location, script, source, "inspect")),
                }
            })
            .collect()
    }

    fn link_warning(
        &self,
        link: PathBuf,
        script: &Path,
        source: io::Error,
        action: &'static str,
    ) -> RunlevelLinkError {
        warn!(
            target: LIFECYCLE_TARGET,
            service = self.descriptor.name(),
            link = %link.display(),
            action,
            error = %source,
            "runlevel link skipped"
        );
        RunlevelLinkError {
            link,
            target: script.to_path_buf(),
            source,
        }
    }
}

/// Creates `path` exclusively with `mode` and writes `contents`, deleting the
/// file again if the write does not complete.
fn write_exclusive(path: &Path, mode: u32, contents: &str) -> Result<(), ServiceError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true).mode(mode);
    let mut file = options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            ServiceError::AlreadyInstalled {
                path: path.to_path_buf(),
            }
        } else {
            ServiceError::CreateConfig {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    drop(file);
    if let Err(source) = written {
        if let Err(error) = fs::remove_file(path) {
            warn!(
                target: LIFECYCLE_TARGET,
                file = %path.display(),
                error = %error,
                "failed to remove partially written control file"
            );
        }
        return Err(ServiceError::WriteConfig {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
