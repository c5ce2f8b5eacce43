//! Organizations, starred repositories, and the group list built from them.

use pulse_core::GroupInfo;
use serde::Deserialize;

use crate::{ForgeClient, ForgeUser, error::ForgeError, http::list_query};

/// An organization the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organization {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// A repository the user has starred.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StarredRepository {
    pub name: String,
    pub full_name: String,
}

impl ForgeClient {
    /// `GET /user/orgs`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on transport, status, or parse failure.
    pub async fn orgs(&self) -> Result<Vec<Organization>, ForgeError> {
        self.get_json(&format!("/user/orgs?{}", list_query(None, &[])))
            .await
    }

    /// `GET /user/starred`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on transport, status, or parse failure.
    pub async fn starred(&self) -> Result<Vec<StarredRepository>, ForgeError> {
        self.get_json(&format!("/user/starred?{}", list_query(None, &[])))
            .await
    }

    /// Groups visible to `user`: its organizations plus the user itself.
    ///
    /// # Errors
    ///
    /// Returns the first [`ForgeError`] from the organization or starred
    /// queries; no partial list is produced.
    pub async fn query_groups(&self, user: &ForgeUser) -> Result<Vec<GroupInfo>, ForgeError> {
        let orgs = self.orgs().await?;
        let starred = self.starred().await?;
        let groups = build_groups(user, orgs, &starred);
        tracing::debug!(count = groups.len(), "groups queried");
        Ok(groups)
    }
}

/// Combine organizations and the user into groups ordered by lowercase login,
/// each carrying the names of its starred repositories.
#[must_use]
pub fn build_groups(
    user: &ForgeUser,
    orgs: Vec<Organization>,
    starred: &[StarredRepository],
) -> Vec<GroupInfo> {
    let mut accounts = orgs;
    accounts.push(Organization {
        id: user.id,
        login: user.login.clone(),
        avatar_url: user.avatar_url.clone(),
    });
    accounts.sort_by_cached_key(|account| account.login.to_lowercase());

    accounts
        .into_iter()
        .map(|account| {
            let prefix = format!("{}/", account.login);
            let starred_repos = starred
                .iter()
                .filter(|repo| repo.full_name.starts_with(&prefix))
                .map(|repo| repo.name.clone())
                .collect();
            GroupInfo {
                id: account.id,
                name: account.login,
                avatar_url: account.avatar_url,
                starred_repos,
            }
        })
        .collect()
}
