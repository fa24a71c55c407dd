use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while discovering, loading or persisting the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither the primary document nor the template exists.
    #[error("no configuration found at {primary} or {template}")]
    NotFound {
        primary: Utf8PathBuf,
        template: Utf8PathBuf,
    },

    /// The document is not valid YAML or does not match the schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Reading, writing, copying or removing a file failed.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory settings could not be encoded as YAML.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// `LOGGING_LEVEL` holds a value that is not a severity name.
    #[error("invalid log level: {0:?}")]
    InvalidLogLevel(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
