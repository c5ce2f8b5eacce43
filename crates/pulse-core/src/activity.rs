//! A single timestamped event on a repository.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened. Each kind feeds exactly one summary counter, except
/// [`ActivityKind::Comment`] which is listed but not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    IssueOpened,
    IssueClosed,
    IssueComment,
    PullRequestOpened,
    PullRequestClosed,
    PullRequestComment,
    Tag,
    Commit,
    /// Comment on something other than an issue or pull request (e.g. a commit).
    Comment,
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueOpened => "issue_opened",
            Self::IssueClosed => "issue_closed",
            Self::IssueComment => "issue_comment",
            Self::PullRequestOpened => "pull_request_opened",
            Self::PullRequestClosed => "pull_request_closed",
            Self::PullRequestComment => "pull_request_comment",
            Self::Tag => "tag",
            Self::Commit => "commit",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity as reported by a forge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub text: String,
    pub url: String,
    /// Commit hash for commit activities; tags are dated through it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl Activity {
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: ActivityKind,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            text: text.into(),
            url: url.into(),
            commit_sha: None,
        }
    }

    #[must_use]
    pub fn with_commit_sha(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Whether this activity is a commit carrying `sha`.
    #[must_use]
    pub fn is_commit_with_sha(&self, sha: &str) -> bool {
        self.kind == ActivityKind::Commit && self.commit_sha.as_deref() == Some(sha)
    }
}
