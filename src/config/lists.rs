use crate::error::{ConfigError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

pub const WHITELIST_FILE_NAME: &str = "whitelist.txt";
pub const BLACKLIST_FILE_NAME: &str = "blacklist.txt";

/// Reads and writes the allow/deny list side files in the application directory.
#[derive(Debug, Clone)]
pub struct ListStore {
    whitelist_path: Utf8PathBuf,
    blacklist_path: Utf8PathBuf,
}

impl ListStore {
    pub fn new<P: AsRef<Utf8Path>>(application_path: P) -> Self {
        let dir = application_path.as_ref();
        Self {
            whitelist_path: dir.join(WHITELIST_FILE_NAME),
            blacklist_path: dir.join(BLACKLIST_FILE_NAME),
        }
    }

    /// Load both lists as `(whitelist, blacklist)`.
    ///
    /// The files are optional: a list that cannot be read is logged and
    /// comes back empty.
    pub fn load(&self) -> (Vec<String>, Vec<String>) {
        (
            read_list(&self.whitelist_path).unwrap_or_else(|e| {
                tracing::error!("Read whitelist failed: {}", e);
                Vec::new()
            }),
            read_list(&self.blacklist_path).unwrap_or_else(|e| {
                tracing::error!("Read blacklist failed: {}", e);
                Vec::new()
            }),
        )
    }

    /// Overwrite both files, one entry per line.
    ///
    /// The whitelist is written first; if the blacklist write then fails the
    /// whitelist is not rolled back.
    pub fn save(&self, whitelist: &[String], blacklist: &[String]) -> Result<()> {
        write_list(&self.whitelist_path, whitelist)?;
        write_list(&self.blacklist_path, blacklist)?;

        tracing::info!(
            "Saved {} whitelist and {} blacklist entries",
            whitelist.len(),
            blacklist.len()
        );
        Ok(())
    }

    pub fn whitelist_path(&self) -> &Utf8Path {
        &self.whitelist_path
    }

    pub fn blacklist_path(&self) -> &Utf8Path {
        &self.blacklist_path
    }
}

/// Whitespace-separated entries of a list file, in file order.
pub fn read_list(path: &Utf8Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    Ok(parse_entries(&contents))
}

fn parse_entries(contents: &str) -> Vec<String> {
    contents
        .split_whitespace()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_list(path: &Utf8Path, entries: &[String]) -> Result<()> {
    let mut contents = String::new();
    for entry in entries {
        contents.push_str(entry);
        contents.push('\n');
    }
    fs::write(path, contents).map_err(|e| ConfigError::io(path, e))
}
