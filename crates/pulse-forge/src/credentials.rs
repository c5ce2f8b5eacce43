//! Forge token storage.
//!
//! Tokens live in the OS keychain when one is available and fall back to a
//! private file (`~/.pulse/credentials`, mode 0600). Loading also honours the
//! `PULSE_FORGE__TOKEN` environment variable between those two tiers.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ForgeError;

const DEFAULT_KEYRING_SERVICE: &str = "pulse-cli";
const KEYRING_USER: &str = "forge-token";
const CREDENTIALS_DIR: &str = ".pulse";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Environment variable consulted when the keyring holds no token.
pub const TOKEN_ENV: &str = "PULSE_FORGE__TOKEN";

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        })
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    keyring_service: Option<String>,
    file_path: PathBuf,
}

impl CredentialStore {
    /// Store backed by the OS keyring and `~/.pulse/credentials`.
    ///
    /// The keyring service defaults to `"pulse-cli"`; `PULSE_KEYRING_SERVICE`
    /// overrides it so test runs never touch real credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Credentials`] if the home directory is unknown.
    pub fn open() -> Result<Self, ForgeError> {
        let home = dirs::home_dir().ok_or_else(|| {
            ForgeError::Credentials("home directory not found, cannot store credentials".into())
        })?;
        let service = std::env::var("PULSE_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        Ok(Self {
            keyring_service: Some(service),
            file_path: home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE_NAME),
        })
    }

    /// Store that never touches the keyring.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            keyring_service: None,
            file_path: path.into(),
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Save `token`, preferring the keyring. Returns the tier written to.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Credentials`] if both keyring and file storage fail.
    pub fn store(&self, token: &str) -> Result<TokenSource, ForgeError> {
        if let Some(entry) = self.entry() {
            match entry.set_password(token) {
                Ok(()) => return Ok(TokenSource::Keyring),
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                }
            }
        }
        self.store_file(token)?;
        Ok(TokenSource::File)
    }

    /// Load a token. Priority: keyring → `PULSE_FORGE__TOKEN` → file.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        self.load_with_source().map(|(token, _)| token)
    }

    /// Which tier the current token comes from.
    #[must_use]
    pub fn detect_source(&self) -> Option<TokenSource> {
        self.load_with_source().map(|(_, source)| source)
    }

    /// Remove the token from the keyring and the credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Credentials`] if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<(), ForgeError> {
        if let Some(entry) = self.entry()
            && let Err(error) = entry.delete_credential()
            && !matches!(error, keyring::Error::NoEntry)
        {
            tracing::debug!(%error, "keyring delete failed");
        }

        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ForgeError::Credentials(format!(
                "failed to delete {}: {error}",
                self.file_path.display()
            ))),
        }
    }

    /// Load a token together with the tier it came from.
    #[must_use]
    pub fn load_with_source(&self) -> Option<(String, TokenSource)> {
        if let Some(entry) = self.entry()
            && let Ok(token) = entry.get_password()
            && !token.is_empty()
        {
            return Some((token, TokenSource::Keyring));
        }

        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some((token, TokenSource::Env));
        }

        self.load_file().map(|token| (token, TokenSource::File))
    }

    fn entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn store_file(&self, token: &str) -> Result<(), ForgeError> {
        let path = &self.file_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ForgeError::Credentials(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(path, token)
            .map_err(|e| ForgeError::Credentials(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| ForgeError::Credentials(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.file_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_is_under_home() {
        let store = CredentialStore::open().expect("should resolve");
        assert!(store.file_path().ends_with(".pulse/credentials"));
    }

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = CredentialStore::file_only(tmp.path().join("pulse").join("credentials"));

        assert_eq!(store.store("ghp_abc123").expect("store"), TokenSource::File);
        assert_eq!(store.load_file().as_deref(), Some("ghp_abc123"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.file_path())
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }

        store.delete().expect("delete");
        assert!(!store.file_path().exists());
        store.delete().expect("second delete is a no-op");
    }

    #[test]
    fn load_file_ignores_whitespace() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("credentials");
        let store = CredentialStore::file_only(&path);

        std::fs::write(&path, "   \n  ").expect("write");
        assert!(store.load_file().is_none());

        std::fs::write(&path, "ghp_xyz\n").expect("write");
        assert_eq!(store.load_file().as_deref(), Some("ghp_xyz"));
    }

    #[test]
    fn token_source_display() {
        assert_eq!(TokenSource::Keyring.to_string(), "keyring");
        assert_eq!(TokenSource::Env.to_string(), "env");
        assert_eq!(TokenSource::File.to_string(), "file");
    }
}
