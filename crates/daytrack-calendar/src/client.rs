//! Graph-style calendar API client.

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::*;

pub(crate) const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self::new_with_base_url(access_token, GRAPH_API_BASE)
    }

    pub fn new_with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Read the signed-in user's profile.
    #[instrument(skip(self), level = "info")]
    pub async fn get_profile(&self) -> Result<UserProfile, CalendarError> {
        let url = format!("{}/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List events whose start falls within a time range.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, CalendarError> {
        let url = format!(
            "{}/me/events?startDateTime={}&endDateTime={}",
            self.base_url,
            urlencoding::encode(&start.to_rfc3339()),
            urlencoding::encode(&end.to_rfc3339()),
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let resp: EventListResponse = self.handle_response(response).await?;
        Ok(resp.value.into_iter().map(Event::from_api).collect())
    }

    /// Create a new event.
    #[instrument(skip(self, body), level = "info")]
    pub async fn create_event(
        &self,
        subject: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        body: Option<&str>,
        location: Option<&str>,
    ) -> Result<Event, CalendarError> {
        let url = format!("{}/me/events", self.base_url);

        let mut payload = serde_json::json!({
            "subject": subject,
            "start": { "dateTime": start.to_rfc3339(), "timeZone": "UTC" },
            "end": { "dateTime": end.to_rfc3339(), "timeZone": "UTC" },
        });

        if let Some(content) = body {
            payload["body"] = serde_json::json!({ "contentType": "Text", "content": content });
        }
        if let Some(loc) = location {
            payload["location"] = serde_json::json!({ "displayName": loc });
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await?;

        let api_event: ApiEvent = self.handle_response(response).await?;
        Ok(Event::from_api(api_event))
    }

    /// Update an existing event.
    #[instrument(skip(self, body), level = "info")]
    pub async fn update_event(
        &self,
        event_id: &str,
        subject: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        body: Option<&str>,
        location: Option<&str>,
    ) -> Result<Event, CalendarError> {
        let url = format!(
            "{}/me/events/{}",
            self.base_url,
            urlencoding::encode(event_id),
        );

        let mut payload = serde_json::Map::new();

        if let Some(s) = subject {
            payload.insert("subject".to_string(), serde_json::Value::String(s.to_string()));
        }
        if let Some(s) = start {
            payload.insert(
                "start".to_string(),
                serde_json::json!({ "dateTime": s.to_rfc3339(), "timeZone": "UTC" }),
            );
        }
        if let Some(e) = end {
            payload.insert(
                "end".to_string(),
                serde_json::json!({ "dateTime": e.to_rfc3339(), "timeZone": "UTC" }),
            );
        }
        if let Some(content) = body {
            payload.insert(
                "body".to_string(),
                serde_json::json!({ "contentType": "Text", "content": content }),
            );
        }
        if let Some(loc) = location {
            payload.insert(
                "location".to_string(),
                serde_json::json!({ "displayName": loc }),
            );
        }

        let response = self
            .client
            .patch(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .send()
            .await?;

        let api_event: ApiEvent = self.handle_response(response).await?;
        Ok(Event::from_api(api_event))
    }

    /// Delete an event.
    #[instrument(skip(self), level = "info")]
    pub async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let url = format!(
            "{}/me/events/{}",
            self.base_url,
            urlencoding::encode(event_id),
        );

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        // Delete returns 204 No Content on success
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::EventNotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "displayName": "Jo Bloggs",
                "mail": "jo@example.com",
                "userPrincipalName": "jo@example.com"
            })))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("test_token", &mock_server.uri());
        let profile = client.get_profile().await.unwrap();

        assert_eq!(profile.display_name.as_deref(), Some("Jo Bloggs"));
    }

    #[tokio::test]
    async fn test_list_events() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {
                        "id": "event1",
                        "subject": "Weekly standup",
                        "start": {"dateTime": "2025-09-08T09:30:00.0000000"},
                        "end": {"dateTime": "2025-09-08T09:45:00.0000000"}
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("test_token", &mock_server.uri());
        let events = client
            .list_events(utc("2025-09-01T00:00:00Z"), utc("2025-09-22T00:00:00Z"))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].subject, "Weekly standup");
    }

    #[tokio::test]
    async fn test_create_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "created1",
                "subject": "Dentist",
                "start": {"dateTime": "2025-09-10T10:00:00.0000000"},
                "end": {"dateTime": "2025-09-10T11:00:00.0000000"}
            })))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("test_token", &mock_server.uri());
        let event = client
            .create_event(
                "Dentist",
                utc("2025-09-10T10:00:00Z"),
                utc("2025-09-10T11:00:00Z"),
                None,
                Some("Clinic"),
            )
            .await
            .unwrap();

        assert_eq!(event.id, "created1");
        assert_eq!(event.subject, "Dentist");
    }

    #[tokio::test]
    async fn test_delete_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/me/events/event123"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("test_token", &mock_server.uri());
        assert!(client.delete_event("event123").await.is_ok());
    }

    #[tokio::test]
    async fn test_token_expired() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("expired_token", &mock_server.uri());
        let result = client.get_profile().await;

        assert!(matches!(result, Err(CalendarError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me/events"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "60"))
            .mount(&mock_server)
            .await;

        let client = CalendarClient::new_with_base_url("token", &mock_server.uri());
        let result = client
            .list_events(utc("2025-09-01T00:00:00Z"), utc("2025-09-22T00:00:00Z"))
            .await;

        assert!(matches!(result, Err(CalendarError::RateLimited(60))));
    }
}
