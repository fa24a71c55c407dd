use super::Settings;
use camino::{Utf8Path, Utf8PathBuf};

/// Filesystem locations resolved while loading.
///
/// `config_path` is where the document was read from (possibly the template)
/// and is what gets backed up before a save. `path` tracks the last location
/// written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeContext {
    pub path: Utf8PathBuf,
    pub config_path: Utf8PathBuf,
    pub application_path: Utf8PathBuf,
}

impl RuntimeContext {
    pub fn new(
        config_path: impl Into<Utf8PathBuf>,
        application_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        let config_path = config_path.into();
        Self {
            path: config_path.clone(),
            config_path,
            application_path: application_path.into(),
        }
    }

    pub fn application_path(&self) -> &Utf8Path {
        &self.application_path
    }
}

/// A loaded configuration: persisted settings plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub settings: Settings,
    pub runtime: RuntimeContext,
}

impl Configuration {
    pub fn whitelist(&self) -> &[String] {
        &self.settings.listing_setting.whitelist
    }

    pub fn blacklist(&self) -> &[String] {
        &self.settings.listing_setting.blacklist
    }
}
