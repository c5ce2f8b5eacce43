//! Persisted dashboard filter.
//!
//! The filter is stored as a small JSON document, `{"starred": bool, "age": ms}`,
//! and restored on the next run. Missing fields fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use pulse_core::Filter;

use crate::error::ConfigError;
use crate::filter::FilterConfig;

#[derive(Debug, Clone)]
pub struct FilterStore {
    path: PathBuf,
}

impl FilterStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the location configured in `[filter]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if no store path is set and the
    /// platform has no config directory.
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        config
            .store_path()
            .map(Self::new)
            .ok_or_else(|| ConfigError::NotConfigured {
                section: "filter.store_path".into(),
            })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted filter. Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read and
    /// [`ConfigError::Json`] if it is not a valid filter document.
    pub fn restore(&self) -> Result<Option<Filter>, ConfigError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let filter = serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "filter restored");
        Ok(Some(filter))
    }

    /// Restore the persisted filter, falling back to `default` when nothing
    /// is stored or the stored document is unreadable.
    #[must_use]
    pub fn restore_or(&self, default: Filter) -> Filter {
        match self.restore() {
            Ok(Some(filter)) => filter,
            Ok(None) => default,
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable persisted filter");
                default
            }
        }
    }

    /// Write the filter, replacing any previous one.
    ///
    /// The document is written to a sibling temp file and renamed into place
    /// so a crash never leaves a truncated filter behind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory or file cannot be written.
    pub fn persist(&self, filter: &Filter) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string(filter).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| ConfigError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "filter persisted");
        Ok(())
    }

    /// Remove the persisted filter. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
