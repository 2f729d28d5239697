//! Connection state for the calendar pane: sign-in ladder, profile, and
//! event loading for the rolling window. Inline error strings are kept for
//! the UI to surface; calendar events are never persisted locally.

use chrono::{DateTime, NaiveDate, Utc};
use daytrack_auth::{AuthClient, AuthError};

use crate::client::{CalendarClient, GRAPH_API_BASE};
use crate::error::CalendarError;
use crate::schedule::RollingWindow;
use crate::types::{Event, UserProfile};

/// A signed-in (or not) calendar connection.
pub struct CalendarSession {
    auth: AuthClient,
    profile: Option<UserProfile>,
    last_error: Option<String>,
    base_url: String,
}

impl CalendarSession {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            profile: None,
            last_error: None,
            base_url: GRAPH_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(auth: AuthClient, base_url: &str) -> Self {
        Self {
            auth,
            profile: None,
            last_error: None,
            base_url: base_url.to_string(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Inline error message from the last failed operation, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Connect interactively: silent token first, browser sign-in if that
    /// fails, then load the profile.
    pub async fn connect(&mut self) -> Result<(), CalendarError> {
        let token = match self.auth.acquire_token_silent().await {
            Ok(token) => token,
            Err(silent_err) => {
                tracing::debug!("Silent token acquisition failed ({}), going interactive", silent_err);
                match self.auth.sign_in_interactive().await {
                    Ok(token) => token,
                    Err(e) => return Err(self.auth_error(e)),
                }
            }
        };

        self.load_profile(&token.access_token).await
    }

    /// Connect without any interaction; fails when no usable token is stored.
    pub async fn connect_silent(&mut self) -> Result<(), CalendarError> {
        let token = match self.auth.acquire_token_silent().await {
            Ok(token) => token,
            Err(e) => return Err(self.auth_error(e)),
        };

        self.load_profile(&token.access_token).await
    }

    /// Sign out and clear the held profile.
    pub fn disconnect(&mut self) {
        if let Err(e) = self.auth.sign_out() {
            tracing::warn!("Sign-out failed: {}", e);
        }
        self.profile = None;
        self.last_error = None;
    }

    /// Fetch the events covering a rolling window.
    pub async fn events_for(
        &mut self,
        window: &RollingWindow,
    ) -> Result<Vec<Event>, CalendarError> {
        let token = match self.auth.acquire_token_silent().await {
            Ok(token) => token,
            Err(e) => return Err(self.auth_error(e)),
        };

        let client = CalendarClient::new_with_base_url(&token.access_token, &self.base_url);
        let (start, end) = window.range();

        match client.list_events(day_start(start), day_start(end)).await {
            Ok(events) => {
                self.last_error = None;
                Ok(events)
            }
            Err(e) => {
                if e.should_refresh_token() {
                    self.profile = None;
                }
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn load_profile(&mut self, access_token: &str) -> Result<(), CalendarError> {
        let client = CalendarClient::new_with_base_url(access_token, &self.base_url);

        match client.get_profile().await {
            Ok(profile) => {
                tracing::info!(
                    "Calendar connected as {}",
                    profile.display_name.as_deref().unwrap_or("unknown user")
                );
                self.profile = Some(profile);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn auth_error(&mut self, e: AuthError) -> CalendarError {
        self.last_error = Some(e.user_message().to_string());
        match e {
            AuthError::TokenExpired => CalendarError::TokenExpired,
            _ => CalendarError::AuthRequired,
        }
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}
