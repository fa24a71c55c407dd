//! Loading and saving of the application configuration.
//!
//! The primary document is `config.yaml` in the application directory, with
//! `config_template.yaml` used on first run. Saves always target
//! `config.yaml` and are wrapped in a [`BackupGuard`] so a failed write leaves
//! the previous document in place. Allow/deny lists are kept in
//! `whitelist.txt` / `blacklist.txt` through [`ListStore`].

pub mod backup;
pub mod lists;
pub mod migrate;

pub use backup::{BACKUP_FILE_NAME, BackupGuard, BackupPolicy};
pub use lists::ListStore;

use crate::error::{ConfigError, Result};
use crate::models::{Configuration, RuntimeContext, Settings};
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml_ng::{Mapping, Value};
use std::fs;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const TEMPLATE_FILE_NAME: &str = "config_template.yaml";

/// Configuration store rooted at the application directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    application_path: Utf8PathBuf,
    backup_policy: BackupPolicy,
}

impl ConfigStore {
    /// Create a store for `application_path`.
    ///
    /// The directory is not created or inspected until [`discover`](Self::discover).
    pub fn new<P: AsRef<Utf8Path>>(application_path: P) -> Self {
        Self {
            application_path: application_path.as_ref().to_path_buf(),
            backup_policy: BackupPolicy::default(),
        }
    }

    pub fn with_backup_policy(mut self, policy: BackupPolicy) -> Self {
        self.backup_policy = policy;
        self
    }

    pub fn application_path(&self) -> &Utf8Path {
        &self.application_path
    }

    pub fn primary_path(&self) -> Utf8PathBuf {
        self.application_path.join(CONFIG_FILE_NAME)
    }

    pub fn template_path(&self) -> Utf8PathBuf {
        self.application_path.join(TEMPLATE_FILE_NAME)
    }

    /// Pick the document to load: `config.yaml` if present, else the template.
    pub fn discover(&self) -> Result<Utf8PathBuf> {
        let primary = self.primary_path();
        if primary.exists() {
            return Ok(primary);
        }

        let template = self.template_path();
        if template.exists() {
            tracing::warn!("{} not found, falling back to {}", primary, template);
            return Ok(template);
        }

        Err(ConfigError::NotFound { primary, template })
    }

    /// Load, normalize and return the configuration.
    pub fn load(&self) -> Result<Configuration> {
        let path = self.discover()?;
        let doc = read_document(&path)?;

        let doc = Value::Mapping(migrate::normalize(doc));
        let settings: Settings =
            serde_yaml_ng::from_value(doc).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        let mut config = Configuration {
            settings,
            runtime: RuntimeContext::new(path, &self.application_path),
        };

        let (whitelist, blacklist) = ListStore::new(&self.application_path).load();
        config.settings.listing_setting.whitelist = whitelist;
        config.settings.listing_setting.blacklist = blacklist;

        tracing::info!("Loaded config from {}", config.runtime.config_path);
        Ok(config)
    }

    /// Write `config` to `<application_path>/config.yaml`.
    ///
    /// The document it was loaded from is backed up first and restored if the
    /// write fails. List entries are not part of the document; see
    /// [`save_lists`](Self::save_lists).
    pub fn save(&self, config: &mut Configuration) -> Result<()> {
        let target = config.runtime.application_path.join(CONFIG_FILE_NAME);
        config.runtime.path = target.clone();

        let result = backup::protect(
            &config.runtime.config_path,
            &config.runtime.application_path,
            self.backup_policy,
            || write_document(&target, &config.settings),
        );

        match result {
            Ok(()) => {
                tracing::info!("Saved config to {}", target);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save config to {}: {}", target, e);
                Err(e)
            }
        }
    }

    /// Write the in-memory allow/deny lists to their side files.
    pub fn save_lists(&self, config: &Configuration) -> Result<()> {
        let listing = &config.settings.listing_setting;
        ListStore::new(&config.runtime.application_path)
            .save(&listing.whitelist, &listing.blacklist)
    }
}

/// Parse the YAML document at `path` into a top-level mapping.
///
/// An empty file reads as an empty mapping.
fn read_document(path: &Utf8Path) -> Result<Mapping> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let parse_error = |source: serde_yaml_ng::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    match serde_yaml_ng::from_str::<Value>(&contents).map_err(parse_error)? {
        Value::Null => Ok(Mapping::new()),
        value => serde_yaml_ng::from_value(value).map_err(parse_error),
    }
}

fn write_document(path: &Utf8Path, settings: &Settings) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(settings).map_err(ConfigError::Serialize)?;
    fs::write(path, yaml).map_err(|e| ConfigError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderValue;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"
telegram_setting:
  api_id: 12345
  api_hash: abcdef
order_setting:
  leverage: "10"
  mode: market
"#;

    fn create_test_config_store() -> (ConfigStore, Utf8PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (ConfigStore::new(&dir), dir, temp_dir)
    }

    #[test]
    fn test_discover_prefers_primary() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(TEMPLATE_FILE_NAME), TEMPLATE).unwrap();
        assert_eq!(store.discover().unwrap(), dir.join(TEMPLATE_FILE_NAME));

        fs::write(dir.join(CONFIG_FILE_NAME), TEMPLATE).unwrap();
        assert_eq!(store.discover().unwrap(), dir.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_not_found() {
        let (store, _dir, _temp_dir) = create_test_config_store();
        assert!(matches!(store.discover(), Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_from_template_normalizes() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(TEMPLATE_FILE_NAME), TEMPLATE).unwrap();

        let config = store.load().unwrap();

        assert_eq!(config.runtime.config_path, dir.join(TEMPLATE_FILE_NAME));
        assert_eq!(config.runtime.path, dir.join(TEMPLATE_FILE_NAME));
        assert_eq!(config.runtime.application_path, dir);
        assert_eq!(config.settings.telegram_setting.session, "anon");
        assert_eq!(config.settings.order_number("leverage"), Some(10.0));
        assert_eq!(
            config.settings.order_setting["mode"],
            OrderValue::Text("market".to_string())
        );
        assert!(!config.settings.make_short());
        assert!(config.whitelist().is_empty());
    }

    #[test]
    fn test_load_empty_document() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(CONFIG_FILE_NAME), "").unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.settings.telegram_setting.session, "anon");
    }

    #[test]
    fn test_load_malformed_yaml() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(CONFIG_FILE_NAME), "telegram_setting: [unclosed\n").unwrap();

        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_non_mapping_document() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(CONFIG_FILE_NAME), "- just\n- a list\n").unwrap();

        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_targets_primary_and_updates_path() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(TEMPLATE_FILE_NAME), TEMPLATE).unwrap();
        let mut config = store.load().unwrap();

        store.save(&mut config).unwrap();

        assert_eq!(config.runtime.path, dir.join(CONFIG_FILE_NAME));
        assert_eq!(config.runtime.config_path, dir.join(TEMPLATE_FILE_NAME));
        assert!(dir.join(CONFIG_FILE_NAME).exists());
        assert_eq!(fs::read_to_string(dir.join(TEMPLATE_FILE_NAME)).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_save_prune_policy_removes_backup() {
        let (store, dir, _temp_dir) = create_test_config_store();
        let store = store.with_backup_policy(BackupPolicy::Prune);
        fs::write(dir.join(CONFIG_FILE_NAME), TEMPLATE).unwrap();
        let mut config = store.load().unwrap();

        store.save(&mut config).unwrap();

        assert!(!dir.join(BACKUP_FILE_NAME).exists());
    }

    #[test]
    fn test_save_lists_round_trip() {
        let (store, dir, _temp_dir) = create_test_config_store();
        fs::write(dir.join(CONFIG_FILE_NAME), TEMPLATE).unwrap();
        let mut config = store.load().unwrap();
        config.settings.listing_setting.whitelist = vec!["BTCUSDT".to_string()];

        store.save_lists(&config).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.whitelist(), ["BTCUSDT".to_string()]);
        assert!(reloaded.blacklist().is_empty());
    }
}
