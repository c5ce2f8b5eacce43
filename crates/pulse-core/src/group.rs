use serde::{Deserialize, Serialize};

/// An organization or user account as reported by a forge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: u64,
    /// Login of the organization or user.
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    /// Names (not full names) of starred repositories inside this group.
    #[serde(default)]
    pub starred_repos: Vec<String>,
}

impl GroupInfo {
    /// Ordering key used by group collections.
    #[must_use]
    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }

    #[must_use]
    pub fn is_repo_starred(&self, repo_name: &str) -> bool {
        self.starred_repos.iter().any(|name| name == repo_name)
    }
}
