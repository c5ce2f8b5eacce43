//! Repository listings for the user and its organizations.

use pulse_core::{GroupInfo, RepositoryInfo};
use serde::Deserialize;

use crate::{ForgeClient, error::ForgeError, http::list_query};

#[derive(Debug, Deserialize)]
struct RepoRecord {
    id: u64,
    name: String,
    full_name: String,
    html_url: String,
}

impl ForgeClient {
    /// `GET /user/repos`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on transport, status, or parse failure.
    pub async fn user_repos(&self) -> Result<Vec<RepositoryInfo>, ForgeError> {
        let records: Vec<RepoRecord> = self
            .get_json(&format!("/user/repos?{}", list_query(None, &[])))
            .await?;
        Ok(records.into_iter().map(RepoRecord::into_info).collect())
    }

    /// `GET /orgs/{org}/repos`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on transport, status, or parse failure.
    pub async fn org_repos(&self, org: &str) -> Result<Vec<RepositoryInfo>, ForgeError> {
        let records: Vec<RepoRecord> = self
            .get_json(&format!(
                "/orgs/{}/repos?{}",
                urlencoding::encode(org),
                list_query(None, &[])
            ))
            .await?;
        Ok(records.into_iter().map(RepoRecord::into_info).collect())
    }

    /// Repositories of `group`: the user's own when the group is the logged-in
    /// account, the organization's otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] if the listing fails.
    pub async fn query_group_repos(
        &self,
        group: &GroupInfo,
        user_login: &str,
    ) -> Result<Vec<RepositoryInfo>, ForgeError> {
        let repos = if group.name == user_login {
            self.user_repos().await?
        } else {
            self.org_repos(&group.name).await?
        };
        let repos = mark_starred(group, repos);
        tracing::debug!(group = %group.name, count = repos.len(), "repositories queried");
        Ok(repos)
    }
}

impl RepoRecord {
    fn into_info(self) -> RepositoryInfo {
        RepositoryInfo {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            repo_url: self.html_url,
            is_starred: false,
        }
    }
}

/// Order repositories by lowercase name and flag those starred in `group`.
#[must_use]
pub fn mark_starred(group: &GroupInfo, mut repos: Vec<RepositoryInfo>) -> Vec<RepositoryInfo> {
    repos.sort_by_cached_key(|repo| repo.name.to_lowercase());
    for repo in &mut repos {
        repo.is_starred = group.is_repo_starred(&repo.name);
    }
    repos
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIXTURE: &str = r#"[
        {
            "id": 2,
            "name": "gadget",
            "full_name": "acme/gadget",
            "html_url": "https://github.com/acme/gadget",
            "private": false,
            "stargazers_count": 3
        },
        {
            "id": 1,
            "name": "Widget",
            "full_name": "acme/Widget",
            "html_url": "https://github.com/acme/Widget"
        },
        {
            "id": 3,
            "name": "anvil",
            "full_name": "acme/anvil",
            "html_url": "https://github.com/acme/anvil"
        }
    ]"#;

    #[test]
    fn mark_starred_sorts_and_flags() {
        let records: Vec<RepoRecord> = serde_json::from_str(FIXTURE).unwrap();
        let repos = records.into_iter().map(RepoRecord::into_info).collect();
        let group = GroupInfo {
            id: 9,
            name: "acme".into(),
            avatar_url: String::new(),
            starred_repos: vec!["Widget".into()],
        };

        let repos = mark_starred(&group, repos);
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["anvil", "gadget", "Widget"]);
        assert_eq!(
            repos.iter().map(|r| r.is_starred).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert_eq!(repos[2].repo_url, "https://github.com/acme/Widget");
    }
}
