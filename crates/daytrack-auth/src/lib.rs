//! OAuth2 sign-in and token persistence for the calendar integration.

pub mod error;
pub mod oauth;
pub mod storage;

pub use error::AuthError;
pub use oauth::{AuthClient, AuthConfig, GRAPH_SCOPES};
pub use storage::{TokenSet, TokenStore};
