//! Activity queries for a single repository.
//!
//! Comments, commits, issues and tags are fetched one after another and
//! converted into [`Activity`] records. Tags carry no date of their own, so a
//! tag is only reported when the commit it points at was fetched in the same
//! run, and it inherits that commit's timestamp and URL.

use chrono::{DateTime, Utc};
use pulse_core::{Activity, ActivityKind, repository::split_full_name};
use serde::Deserialize;

use crate::{ForgeClient, error::ForgeError, http::list_query};

#[derive(Debug, Deserialize)]
struct CommentRecord {
    html_url: String,
    #[serde(default)]
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitRecord {
    sha: String,
    html_url: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    #[serde(default)]
    committer: Option<GitSignature>,
    #[serde(default)]
    author: Option<GitSignature>,
}

#[derive(Debug, Deserialize)]
struct GitSignature {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct IssueRecord {
    number: u64,
    title: String,
    html_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
    commit: TagCommit,
}

#[derive(Debug, Deserialize)]
struct TagCommit {
    sha: String,
}

/// A tag and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub sha: String,
}

impl ForgeClient {
    /// `GET /repos/{full_name}/issues/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on an invalid name, transport, status, or parse failure.
    pub async fn comments(
        &self,
        full_name: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Activity>, ForgeError> {
        let path = format!(
            "{}/issues/comments?{}",
            repo_path(full_name)?,
            list_query(since, &[])
        );
        let records: Vec<CommentRecord> = self.get_json(&path).await?;
        Ok(records.into_iter().map(comment_activity).collect())
    }

    /// `GET /repos/{full_name}/commits`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on an invalid name, transport, status, or parse failure.
    pub async fn commits(
        &self,
        full_name: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Activity>, ForgeError> {
        let path = format!(
            "{}/commits?{}",
            repo_path(full_name)?,
            list_query(since, &[])
        );
        let records: Vec<CommitRecord> = self.get_json(&path).await?;
        Ok(records.into_iter().filter_map(commit_activity).collect())
    }

    /// `GET /repos/{full_name}/issues?state=all`. Pull requests are included.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on an invalid name, transport, status, or parse failure.
    pub async fn issues(
        &self,
        full_name: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Activity>, ForgeError> {
        let path = format!(
            "{}/issues?{}",
            repo_path(full_name)?,
            list_query(since, &[("state", "all")])
        );
        let records: Vec<IssueRecord> = self.get_json(&path).await?;
        Ok(records.into_iter().flat_map(issue_activities).collect())
    }

    /// `GET /repos/{full_name}/tags`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] on an invalid name, transport, status, or parse failure.
    pub async fn tags(&self, full_name: &str) -> Result<Vec<Tag>, ForgeError> {
        let path = format!("{}/tags?{}", repo_path(full_name)?, list_query(None, &[]));
        let records: Vec<TagRecord> = self.get_json(&path).await?;
        Ok(records
            .into_iter()
            .map(|t| Tag {
                name: t.name,
                sha: t.commit.sha,
            })
            .collect())
    }

    /// Fetch every activity of `full_name` created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ForgeError`]; later queries are not attempted.
    pub async fn try_query_activities(
        &self,
        full_name: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Activity>, ForgeError> {
        let mut activities = self.comments(full_name, since).await?;
        activities.extend(self.commits(full_name, since).await?);
        activities.extend(self.issues(full_name, since).await?);
        let tags = self.tags(full_name).await?;
        let tagged = tag_activities(&tags, &activities);
        activities.extend(tagged);
        tracing::debug!(repo = full_name, count = activities.len(), "activities queried");
        Ok(activities)
    }

    /// Like [`Self::try_query_activities`], but a failure is logged and
    /// reported as `None` ("not loaded").
    pub async fn query_activities(
        &self,
        full_name: &str,
        since: Option<DateTime<Utc>>,
    ) -> Option<Vec<Activity>> {
        match self.try_query_activities(full_name, since).await {
            Ok(activities) => Some(activities),
            Err(error) => {
                tracing::warn!(repo = full_name, %error, "activities not loaded");
                None
            }
        }
    }
}

fn repo_path(full_name: &str) -> Result<String, ForgeError> {
    let (owner, name) = split_full_name(full_name)?;
    Ok(format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(name)
    ))
}

/// Classify a comment by its web URL: `/{owner}/{repo}/issues/{n}` is an
/// issue comment, `/{owner}/{repo}/pull/{n}` a pull request comment.
fn comment_kind(html_url: &str) -> ActivityKind {
    let Ok(url) = reqwest::Url::parse(html_url) else {
        return ActivityKind::Comment;
    };
    let segments: Vec<&str> = url.path().split('/').collect();
    if segments.len() != 5 {
        return ActivityKind::Comment;
    }
    match segments[3] {
        "issues" => ActivityKind::IssueComment,
        "pull" => ActivityKind::PullRequestComment,
        _ => ActivityKind::Comment,
    }
}

fn comment_activity(record: CommentRecord) -> Activity {
    let kind = comment_kind(&record.html_url);
    Activity::new(
        record.created_at,
        kind,
        format!("Comment: {}", record.body.unwrap_or_default()),
        record.html_url,
    )
}

fn commit_activity(record: CommitRecord) -> Option<Activity> {
    let Some(date) = record
        .commit
        .committer
        .or(record.commit.author)
        .map(|signature| signature.date)
    else {
        tracing::debug!(sha = %record.sha, "skipping commit without a date");
        return None;
    };
    Some(
        Activity::new(
            date,
            ActivityKind::Commit,
            format!("Commit: {}", record.commit.message),
            record.html_url,
        )
        .with_commit_sha(record.sha),
    )
}

fn issue_activities(record: IssueRecord) -> Vec<Activity> {
    let is_pull_request = record.pull_request.is_some();
    let (opened, closed) = if is_pull_request {
        (ActivityKind::PullRequestOpened, ActivityKind::PullRequestClosed)
    } else {
        (ActivityKind::IssueOpened, ActivityKind::IssueClosed)
    };
    let text = format!("#{}: {}", record.number, record.title);

    let mut activities = vec![Activity::new(
        record.created_at,
        opened,
        text.clone(),
        record.html_url.clone(),
    )];
    if let Some(closed_at) = record.closed_at {
        activities.push(Activity::new(closed_at, closed, text, record.html_url));
    }
    activities
}

/// Tag activities for every tag whose commit is among `activities`.
fn tag_activities(tags: &[Tag], activities: &[Activity]) -> Vec<Activity> {
    tags.iter()
        .filter_map(|tag| {
            let commit = activities.iter().find(|a| a.is_commit_with_sha(&tag.sha))?;
            Some(Activity::new(
                commit.timestamp,
                ActivityKind::Tag,
                format!("Tag: {}", tag.name),
                commit.url.clone(),
            ))
        })
        .collect()
}
