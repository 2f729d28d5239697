//! Authentication error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not signed in")]
    TokenNotFound,

    #[error("Token expired")]
    TokenExpired,

    #[error("Sign-in was cancelled")]
    Cancelled,

    #[error("State mismatch in OAuth callback")]
    CsrfMismatch,

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TokenNotFound => "Not signed in. Please connect your account.",
            Self::TokenExpired => "Your session has expired. Please sign in again.",
            Self::Cancelled => "Sign-in was cancelled.",
            Self::CsrfMismatch => "Sign-in failed a security check. Please try again.",
            Self::OAuthFailed(_) => "Sign-in failed. Please try again.",
            Self::Storage(_) => "Failed to save sign-in credentials. Please try again.",
        }
    }
}
