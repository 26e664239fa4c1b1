//! User settings, stored as JSON in the config directory.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fleet_table::{PageSize, ViewerOptions};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths;

/// Environment variable overriding the directory source path.
pub const DATA_DIR_ENV: &str = "FLEET_ADMIN_DATA";

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Where records come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSettings {
    /// One `<resource>.json` file per resource in a directory.
    Directory { path: PathBuf },
    /// The REST backend.
    Http {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
    },
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::Directory {
            path: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page_size: usize,
    /// Columns kept visible in the compact layout.
    pub primary_columns: usize,
    /// Terminal width below which the compact layout is used.
    pub compact_breakpoint: u16,
    pub source: SourceSettings,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 10,
            primary_columns: fleet_table::DEFAULT_PRIMARY_COUNT,
            compact_breakpoint: 100,
            source: SourceSettings::default(),
            log_level: "info".into(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings: Settings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from the platform config directory and apply environment
    /// overrides.
    pub fn load_default() -> Result<Self, SettingsError> {
        let mut settings = match paths::settings_file() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            settings.source = SourceSettings::Directory {
                path: PathBuf::from(dir),
            };
        }
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source: io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.page_size()?;
        self.log_level()?;
        if let SourceSettings::Http { base_url, .. } = &self.source {
            url::Url::parse(base_url).map_err(|e| SettingsError::Invalid {
                field: "source.base_url",
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn page_size(&self) -> Result<PageSize, SettingsError> {
        PageSize::new(self.page_size).map_err(|e| SettingsError::Invalid {
            field: "page_size",
            message: e.to_string(),
        })
    }

    pub fn log_level(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| SettingsError::Invalid {
            field: "log_level",
            message: format!("unknown level {:?}", self.log_level),
        })
    }

    /// Viewer options derived from these settings.
    pub fn viewer_options(&self, filterable: bool) -> ViewerOptions {
        ViewerOptions {
            searchable: true,
            filterable,
            page_size: self.page_size().unwrap_or_default(),
            primary_count: self.primary_columns,
        }
    }
}
