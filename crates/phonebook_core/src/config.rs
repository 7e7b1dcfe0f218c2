//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Pick the storage backend and data directory.
//! - Pick log level and log directory.
//!
//! # Invariants
//! - Resolution never touches the filesystem; directories are created by the
//!   code that writes into them.
//! - A relative data directory is resolved against the working directory.
//! - Empty or whitespace-only variables count as unset.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "PHONEBOOK_BACKEND";
pub const ENV_DATA_DIR: &str = "PHONEBOOK_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "PHONEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PHONEBOOK_LOG_DIR";

const DEFAULT_DATA_DIR_NAME: &str = "phonebook";
const LOG_DIR_NAME: &str = "logs";

/// Where the contacts slot is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// `<data_dir>/contacts.json`.
    #[default]
    Json,
    /// `slots` table in `<data_dir>/phonebook.sqlite3`.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBackend(String),
    InvalidLogLevel(String),
    InvalidDataDir(PathBuf),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackend(value) => {
                write!(f, "unsupported storage backend `{value}`; expected json|sqlite")
            }
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidDataDir(path) => {
                write!(f, "cannot resolve data directory `{}`", path.display())
            }
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl PhonebookConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend = match read(ENV_BACKEND) {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };
        let data_dir = match read(ENV_DATA_DIR).map(PathBuf::from) {
            Some(dir) => {
                std::path::absolute(&dir).map_err(|_| ConfigError::InvalidDataDir(dir))?
            }
            None => std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
        };
        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log_dir = read(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME));

        Self {
            backend,
            data_dir,
            log_level,
            log_dir,
        }
        .validated()
    }

    /// Replaces the data directory; a log directory derived from the old
    /// data directory follows it.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if self.log_dir == self.data_dir.join(LOG_DIR_NAME) {
            self.log_dir = data_dir.join(LOG_DIR_NAME);
        }
        self.data_dir = data_dir;
        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !self.log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(self.log_dir));
        }
        Ok(self)
    }
}
