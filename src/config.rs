//! Archive-location configuration.
//!
//! Three constants drive link classification and rewriting: the archive host,
//! the path prefix under which the archive serves messages, and the local
//! prefix used for rewritten links. They are loaded once at startup from
//! `maildown.toml` when present and treated as immutable afterwards.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "maildown.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the archive lives and where rewritten links point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Host serving the archive pages, e.g. `mail.openjdk.org`.
    pub archive_host: String,
    /// Path prefix of archived messages on that host.
    pub archive_prefix: String,
    /// Local path prefix substituted when rewriting archive links.
    pub rendered_prefix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            archive_host: "mail.openjdk.org".to_string(),
            archive_prefix: "pipermail".to_string(),
            rendered_prefix: "mail".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: display, source })
    }

    /// Load `maildown.toml` from the working directory when present, falling
    /// back to the compiled-in defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(Self::default())
        }
    }
}
