use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::AuthError;

/// Token set for OAuth2 authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API requests
    pub access_token: String,

    /// Optional refresh token for token renewal
    pub refresh_token: Option<String>,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,

    /// Scopes granted to this token
    pub scopes: Vec<String>,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 300
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// File-backed token storage under the user config directory.
///
/// One JSON file per service, named `<service>.json`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Store rooted at the default config directory.
    pub fn new() -> Result<Self, AuthError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| AuthError::Storage("No config directory available".to_string()))?
            .join("daytrack")
            .join("tokens");
        Ok(Self { dir })
    }

    /// Store rooted at an explicit directory (tests).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self, service: &str) -> Result<PathBuf, AuthError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AuthError::Storage(format!("Failed to create token directory: {}", e)))?;
        Ok(self.dir.join(format!("{}.json", service)))
    }

    /// Persist a token set for a service.
    pub fn save(&self, service: &str, token_set: &TokenSet) -> Result<(), AuthError> {
        let path = self.token_path(service)?;

        let json = serde_json::to_string_pretty(token_set)
            .map_err(|e| AuthError::Storage(format!("Failed to serialize token set: {}", e)))?;

        fs::write(&path, json)
            .map_err(|e| AuthError::Storage(format!("Failed to write token file: {}", e)))?;

        tracing::info!("Stored token for service: {}", service);
        Ok(())
    }

    /// Load a token set, or `None` when the service has never signed in.
    pub fn load(&self, service: &str) -> Result<Option<TokenSet>, AuthError> {
        let path = self.token_path(service)?;
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| AuthError::Storage(format!("Failed to read token file: {}", e)))?;

        let token_set = serde_json::from_str(&json)
            .map_err(|e| AuthError::Storage(format!("Failed to parse token file: {}", e)))?;

        Ok(Some(token_set))
    }

    /// Delete a stored token set (sign-out).
    pub fn delete(&self, service: &str) -> Result<(), AuthError> {
        let path = self.token_path(service)?;

        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| AuthError::Storage(format!("Failed to delete token file: {}", e)))?;
            tracing::info!("Deleted token for service: {}", service);
        }

        Ok(())
    }

    /// Check if a token exists for a service.
    pub fn has_token(&self, service: &str) -> bool {
        matches!(self.load(service), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::tempdir;

    fn token(expires_at: i64) -> TokenSet {
        TokenSet {
            access_token: "test".to_string(),
            refresh_token: None,
            expires_at,
            scopes: vec![],
        }
    }

    #[test]
    fn test_token_expiry() {
        let now = chrono::Utc::now().timestamp();

        let expired = token(now - 3600);
        assert!(expired.is_expired());
        assert!(expired.needs_refresh());

        let valid = token(now + 3600);
        assert!(!valid.is_expired());
        assert!(!valid.needs_refresh());

        // Within the 5 minute refresh buffer
        let soon = token(now + 200);
        assert!(!soon.is_expired());
        assert!(soon.needs_refresh());
    }

    #[test]
    fn test_save_load_delete_roundtrip() {
        let dir = tempdir().unwrap();
        let store = TokenStore::at(dir.path());

        assert!(store.load("calendar").unwrap().is_none());
        assert!(!store.has_token("calendar"));

        let token_set = TokenSet {
            access_token: "abc".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: 12345,
            scopes: vec!["User.Read".to_string()],
        };
        store.save("calendar", &token_set).unwrap();

        let loaded = store.load("calendar").unwrap().unwrap();
        assert_eq!(loaded.access_token, "abc");
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));
        assert!(store.has_token("calendar"));

        store.delete("calendar").unwrap();
        assert!(store.load("calendar").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_token_is_ok() {
        let dir = tempdir().unwrap();
        let store = TokenStore::at(dir.path());
        assert!(store.delete("never-signed-in").is_ok());
    }
}
