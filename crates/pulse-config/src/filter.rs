//! Filter defaults and persistence location.

use std::path::PathBuf;

use pulse_core::Filter;
use serde::{Deserialize, Serialize};

const fn default_age_days() -> u64 {
    365
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Where the filter is persisted. Empty means `{config_dir}/pulse/filter.json`.
    #[serde(default)]
    pub store_path: String,

    /// Starred filter used when nothing has been persisted yet.
    #[serde(default)]
    pub default_starred: bool,

    /// Age filter (days) used when nothing has been persisted yet; `0` disables it.
    #[serde(default = "default_age_days")]
    pub default_age_days: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            store_path: String::new(),
            default_starred: false,
            default_age_days: default_age_days(),
        }
    }
}

impl FilterConfig {
    #[must_use]
    pub fn default_filter(&self) -> Filter {
        Filter::default()
            .with_starred(self.default_starred)
            .with_age_days(self.default_age_days)
    }

    /// Resolved location of the persisted filter.
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        if self.store_path.is_empty() {
            dirs::config_dir().map(|p| p.join("pulse").join("filter.json"))
        } else {
            Some(PathBuf::from(&self.store_path))
        }
    }
}
