use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A repository record as reported by a forge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub id: u64,
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    pub repo_url: String,
    #[serde(default)]
    pub is_starred: bool,
}

impl RepositoryInfo {
    /// Ordering key used by repository collections.
    #[must_use]
    pub fn sort_key(&self) -> String {
        self.full_name.to_lowercase()
    }

    /// Owner portion of `full_name`.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.full_name.split_once('/').map(|(owner, _)| owner)
    }
}

/// Split an `owner/name` string, rejecting anything else.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRepositoryName`] when either part is empty or
/// more than one `/` is present.
pub fn split_full_name(full_name: &str) -> Result<(&str, &str), CoreError> {
    match full_name.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(CoreError::InvalidRepositoryName(full_name.to_string())),
    }
}
