//! Browser-based OAuth2 sign-in against the Microsoft identity platform,
//! with the silent/interactive acquisition ladder the calendar pane expects:
//! a stored fresh token is used as-is, a stale one is refreshed, and only
//! then does the caller fall back to an interactive browser flow.

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, CsrfToken, PkceCodeChallenge, RedirectUrl, RefreshToken,
    Scope, TokenResponse, TokenUrl,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use warp::Filter;

use crate::error::AuthError;
use crate::storage::{TokenSet, TokenStore};

/// Delegated permissions requested at sign-in.
pub const GRAPH_SCOPES: &[&str] = &[
    "User.Read",
    "Calendars.ReadWrite",
    "Calendars.Read.Shared",
    "offline_access",
];

/// Token file name under the token store.
const SERVICE: &str = "microsoft";

/// OAuth2 endpoints and app registration settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Application (client) ID
    pub client_id: String,

    /// Directory tenant, or "common"
    pub tenant: String,

    /// Local port for the redirect callback
    pub redirect_port: u16,

    /// Scopes to request
    pub scopes: Vec<String>,
}

impl AuthConfig {
    /// Config for the Microsoft identity platform with the calendar scopes.
    pub fn microsoft(client_id: &str, tenant: &str, redirect_port: u16) -> Self {
        Self {
            client_id: client_id.to_string(),
            tenant: tenant.to_string(),
            redirect_port,
            scopes: GRAPH_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn authorize_endpoint(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize",
            self.tenant
        )
    }

    fn token_endpoint(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.tenant
        )
    }

    fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }
}

/// OAuth2 client with persistent token storage.
pub struct AuthClient {
    config: AuthConfig,
    store: TokenStore,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        Ok(Self {
            config,
            store: TokenStore::new()?,
        })
    }

    /// Client with an explicit token store (tests).
    pub fn with_store(config: AuthConfig, store: TokenStore) -> Self {
        Self { config, store }
    }

    fn oauth_client(&self) -> Result<BasicClient, AuthError> {
        let auth_url = AuthUrl::new(self.config.authorize_endpoint())
            .map_err(|e| AuthError::OAuthFailed(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(self.config.token_endpoint())
            .map_err(|e| AuthError::OAuthFailed(format!("Invalid token URL: {}", e)))?;
        let redirect_uri = RedirectUrl::new(self.config.redirect_uri())
            .map_err(|e| AuthError::OAuthFailed(format!("Invalid redirect URI: {}", e)))?;

        // Public client: no secret, PKCE carries the proof
        Ok(
            BasicClient::new(ClientId::new(self.config.client_id.clone()), None, auth_url, Some(token_url))
                .set_redirect_uri(redirect_uri),
        )
    }

    /// Interactive sign-in: open the browser, wait for the local callback,
    /// exchange the code, persist the token set.
    pub async fn sign_in_interactive(&self) -> Result<TokenSet, AuthError> {
        let client = self.oauth_client()?;

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &self.config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (auth_url, csrf_token) = request.set_pkce_challenge(pkce_challenge).url();

        tracing::info!("Opening browser for sign-in...");

        // Local callback server
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(tokio::sync::Mutex::new(Some(tx)));

        let routes = warp::get()
            .and(warp::path("callback"))
            .and(warp::query::<std::collections::HashMap<String, String>>())
            .and(warp::any().map(move || tx.clone()))
            .and_then(
                |params: std::collections::HashMap<String, String>,
                 tx: Arc<tokio::sync::Mutex<Option<oneshot::Sender<(String, String)>>>>| async move {
                    let code = params.get("code").cloned().unwrap_or_default();
                    let state = params.get("state").cloned().unwrap_or_default();

                    if let Some(sender) = tx.lock().await.take() {
                        let _ = sender.send((code, state));
                    }

                    Ok::<_, warp::Rejection>(warp::reply::html(
                        "<html><body><h1>Sign-in complete</h1><p>You can close this window and return to daytrack.</p></body></html>",
                    ))
                },
            );

        let server = warp::serve(routes).bind(([127, 0, 0, 1], self.config.redirect_port));
        tokio::spawn(server);

        webbrowser::open(auth_url.as_str())
            .map_err(|e| AuthError::OAuthFailed(format!("Failed to open browser: {}", e)))?;

        // Wait for the redirect
        let (code, state) = rx
            .await
            .map_err(|_| AuthError::OAuthFailed("Callback channel closed".to_string()))?;

        if state != *csrf_token.secret() {
            return Err(AuthError::CsrfMismatch);
        }
        if code.is_empty() {
            return Err(AuthError::Cancelled);
        }

        let token_result = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::OAuthFailed(e.to_string()))?;

        let token_set = token_set_from(&token_result);
        self.store.save(SERVICE, &token_set)?;

        tracing::info!("Interactive sign-in completed");
        Ok(token_set)
    }

    /// Silent acquisition: the stored token if fresh, a refresh-grant when a
    /// refresh token is available, an error otherwise.
    pub async fn acquire_token_silent(&self) -> Result<TokenSet, AuthError> {
        let Some(token) = self.store.load(SERVICE)? else {
            return Err(AuthError::TokenNotFound);
        };

        if !token.needs_refresh() {
            return Ok(token);
        }

        match token.refresh_token.clone() {
            Some(refresh_token) => self.refresh(refresh_token).await,
            None if token.is_expired() => Err(AuthError::TokenExpired),
            // Inside the refresh buffer but still valid and not refreshable
            None => Ok(token),
        }
    }

    async fn refresh(&self, refresh_token: String) -> Result<TokenSet, AuthError> {
        let client = self.oauth_client()?;

        let token_result = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.clone()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::OAuthFailed(format!("Token refresh failed: {}", e)))?;

        let mut token_set = token_set_from(&token_result);
        // The identity platform may omit the refresh token on renewal
        if token_set.refresh_token.is_none() {
            token_set.refresh_token = Some(refresh_token);
        }

        self.store.save(SERVICE, &token_set)?;
        tracing::info!("Refreshed access token");
        Ok(token_set)
    }

    /// Check if signed in with an unexpired token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(SERVICE), Ok(Some(token)) if !token.is_expired())
    }

    /// Sign out (delete the stored token).
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete(SERVICE)
    }
}

fn token_set_from(token_result: &oauth2::basic::BasicTokenResponse) -> TokenSet {
    let expires_in = token_result
        .expires_in()
        .map(|d| d.as_secs() as i64)
        .unwrap_or(3600);

    TokenSet {
        access_token: token_result.access_token().secret().clone(),
        refresh_token: token_result.refresh_token().map(|t| t.secret().clone()),
        expires_at: chrono::Utc::now().timestamp() + expires_in,
        scopes: token_result
            .scopes()
            .map(|s| s.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_default(),
    }
}
