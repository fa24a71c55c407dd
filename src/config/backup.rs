use crate::error::{ConfigError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the backup copy, created next to the primary document.
pub const BACKUP_FILE_NAME: &str = "config_backup.yaml";

/// What happens to the backup once a write has succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Leave `config_backup.yaml` on disk.
    #[default]
    Keep,
    /// Delete `config_backup.yaml`.
    Prune,
}

/// Backup of the primary document taken before a destructive write.
///
/// Consume the guard with [`keep`](Self::keep), [`prune`](Self::prune) or
/// [`restore`](Self::restore). A guard dropped without being consumed (for
/// instance while unwinding from a panic in the write) restores the backup.
#[derive(Debug)]
pub struct BackupGuard {
    source: Utf8PathBuf,
    backup: Utf8PathBuf,
    armed: bool,
}

impl BackupGuard {
    /// Copy `config_path` to `<application_path>/config_backup.yaml`.
    pub fn acquire(config_path: &Utf8Path, application_path: &Utf8Path) -> Result<Self> {
        let backup = application_path.join(BACKUP_FILE_NAME);
        fs::copy(config_path, &backup).map_err(|e| ConfigError::io(config_path, e))?;

        tracing::debug!("Backed up {} to {}", config_path, backup);
        Ok(Self {
            source: config_path.to_path_buf(),
            backup,
            armed: true,
        })
    }

    pub fn backup_path(&self) -> &Utf8Path {
        &self.backup
    }

    /// Accept the write and leave the backup file in place.
    pub fn keep(mut self) {
        self.armed = false;
    }

    /// Accept the write and delete the backup file.
    pub fn prune(mut self) -> Result<()> {
        self.armed = false;
        fs::remove_file(&self.backup).map_err(|e| ConfigError::io(&self.backup, e))
    }

    /// Copy the backup back over the primary document and delete the backup.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        self.restore_in_place()
    }

    fn restore_in_place(&self) -> Result<()> {
        fs::copy(&self.backup, &self.source).map_err(|e| ConfigError::io(&self.source, e))?;
        fs::remove_file(&self.backup).map_err(|e| ConfigError::io(&self.backup, e))?;

        tracing::info!("Restored {} from {}", self.source, self.backup);
        Ok(())
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.restore_in_place() {
                tracing::error!("Failed to restore {} from backup: {}", self.source, e);
            }
        }
    }
}

/// Run `write` with `config_path` backed up.
///
/// If the backup cannot be taken, `write` is never called. If `write` fails
/// the primary document is restored, the backup removed, and the write's
/// error returned. On success the backup is handled according to `policy`.
pub fn protect<T, F>(
    config_path: &Utf8Path,
    application_path: &Utf8Path,
    policy: BackupPolicy,
    write: F,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let guard = BackupGuard::acquire(config_path, application_path)?;

    match write() {
        Ok(value) => {
            match policy {
                BackupPolicy::Keep => guard.keep(),
                BackupPolicy::Prune => {
                    if let Err(e) = guard.prune() {
                        tracing::warn!("Could not remove stale backup: {}", e);
                    }
                }
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(restore_err) = guard.restore() {
                tracing::error!(
                    "Failed to restore {} from backup: {}",
                    config_path,
                    restore_err
                );
            }
            Err(err)
        }
    }
}
