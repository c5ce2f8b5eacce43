//! The authenticated account.

use serde::{Deserialize, Serialize};

use crate::{ForgeClient, error::ForgeError};

/// The account a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
}

impl ForgeClient {
    /// Fetch the authenticated user (`GET /user`). Used to verify a token.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] if the request fails, the forge rejects the
    /// token, or the response cannot be parsed.
    pub async fn user(&self) -> Result<ForgeUser, ForgeError> {
        let user: ForgeUser = self.get_json("/user").await?;
        tracing::debug!(login = %user.login, "authenticated");
        Ok(user)
    }
}
