//! tradebot-config - startup entry point.
//!
//! Resolves the application directory, initializes logging from
//! `LOGGING_LEVEL`, then loads and normalizes the configuration so that a
//! missing or malformed document aborts startup before anything else runs.
//!
//! # Application directory
//!
//! The directory holding the running executable is used when it contains
//! `config.yaml` or `config_template.yaml`; otherwise the current working
//! directory is used. Logs go to `<application dir>/logs`.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tradebot_config::config::{CONFIG_FILE_NAME, TEMPLATE_FILE_NAME};
use tradebot_config::{APP_NAME, ConfigStore, VERSION, logging};

fn main() -> Result<()> {
    // An unrecognized level is fatal before any logging is installed
    let level = logging::log_level_from_env()?;

    let application_path = resolve_application_path()?;
    let _guard = logging::setup_logging(&application_path.join("logs"), APP_NAME, level, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!("Application directory: {}", application_path);

    let store = ConfigStore::new(&application_path);
    let config = store.load().context("Failed to load configuration")?;

    tracing::info!(
        "Loaded configuration - session: {}, order settings: {}, make_short: {}",
        config.settings.telegram_setting.session,
        config.settings.order_setting.len(),
        config.settings.make_short()
    );
    tracing::info!(
        "Listing - whitelist: {} ({} entries), blacklist: {} ({} entries)",
        config.settings.listing_setting.whitelist_activate,
        config.whitelist().len(),
        config.settings.listing_setting.blacklist_activate,
        config.blacklist().len()
    );

    Ok(())
}

fn resolve_application_path() -> Result<Utf8PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .and_then(|dir| Utf8PathBuf::try_from(dir).ok());

    if let Some(dir) = exe_dir {
        if dir.join(CONFIG_FILE_NAME).exists() || dir.join(TEMPLATE_FILE_NAME).exists() {
            return Ok(dir);
        }
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")
}
