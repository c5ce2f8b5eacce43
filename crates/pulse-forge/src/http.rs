//! Response checks and query strings shared by the endpoint modules.
//!
//! GitHub signals rate limiting in two ways: a 429, or a 403 whose
//! `x-ratelimit-remaining` is zero. The wait comes from `retry-after` when
//! present, else from the `x-ratelimit-reset` epoch.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use crate::error::ForgeError;

/// Items requested per page. Only the first page is fetched.
pub const PER_PAGE: u32 = 100;

const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";
const DEFAULT_WAIT_SECS: u64 = 60;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pass a successful response through, or turn it into a [`ForgeError`].
pub async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ForgeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if is_rate_limited(status, resp.headers()) {
        let retry_after_secs = rate_limit_wait(resp.headers(), Utc::now());
        tracing::warn!(retry_after_secs, "forge rate limit reached");
        return Err(ForgeError::RateLimited { retry_after_secs });
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ForgeError::Api {
        status: status.as_u16(),
        message: api_message(body),
    })
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && header_u64(headers, RATELIMIT_REMAINING) == Some(0))
}

/// Seconds until the forge accepts requests again.
fn rate_limit_wait(headers: &HeaderMap, now: DateTime<Utc>) -> u64 {
    if let Some(secs) = header_u64(headers, RETRY_AFTER.as_str()) {
        return secs;
    }
    header_u64(headers, RATELIMIT_RESET)
        .and_then(|reset| i64::try_from(reset).ok())
        .map_or(DEFAULT_WAIT_SECS, |reset| {
            u64::try_from(reset - now.timestamp()).unwrap_or(0)
        })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// GitHub error bodies are `{"message": ...}`; anything else is kept verbatim.
fn api_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body).map_or(body, |error| error.message)
}

/// Query string for list endpoints: `per_page`, plus `since` when given and
/// any extra `key=value` pairs.
pub fn list_query(since: Option<DateTime<Utc>>, extra: &[(&str, &str)]) -> String {
    let mut query = format!("per_page={PER_PAGE}");
    if let Some(since) = since {
        query.push_str("&since=");
        query.push_str(&urlencoding::encode(
            &since.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    for (key, value) in extra {
        query.push('&');
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }
    query
}
