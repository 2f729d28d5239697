//! Client for the hosted table service (PostgREST-style REST, as exposed by
//! Supabase projects). Absence of configuration yields no client at all; the
//! tracker then runs purely against the local snapshot store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::error::StoreError;

/// REST client for the hosted table service.
pub struct RemoteDb {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RemoteDb {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build a client from raw settings, or `None` when they are absent or
    /// still placeholders. Callers treat `None` as local-only mode.
    pub fn from_parts(url: &str, api_key: &str) -> Option<Self> {
        if url.is_empty() || api_key.is_empty() || url.starts_with("your_") {
            return None;
        }
        Some(Self::new(url, api_key))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Select all rows of a table with ordering.
    #[instrument(skip(self), level = "info")]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        order_column: &str,
        ascending: bool,
    ) -> Result<Vec<T>, StoreError> {
        let direction = if ascending { "asc" } else { "desc" };
        let order = format!("{}.{}", order_column, direction);
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", order.as_str())])
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.handle_response(table, response).await
    }

    /// Insert a row and return the stored representation.
    #[instrument(skip(self, row), level = "info")]
    pub async fn insert<T>(&self, table: &str, row: &T) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let mut rows: Vec<T> = self.handle_response(table, response).await?;
        rows.pop()
            .ok_or_else(|| StoreError::Api(format!("insert into {} returned no rows", table)))
    }

    /// Patch a row by id.
    #[instrument(skip(self, patch), level = "info")]
    pub async fn update(
        &self,
        table: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", &format!("eq.{}", id))])
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
            .json(patch)
            .send()
            .await?;

        self.check_status(table, response).await
    }

    /// Delete a row by id.
    #[instrument(skip(self), level = "info")]
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", &format!("eq.{}", id))])
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.check_status(table, response).await
    }

    /// Decode a JSON response body, mapping error statuses first.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        table: &str,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| StoreError::Api(format!("JSON parse error: {}", e)))
        } else {
            Err(self.status_error(table, status, response).await)
        }
    }

    /// Check a response status for calls whose body is irrelevant.
    async fn check_status(
        &self,
        table: &str,
        response: reqwest::Response,
    ) -> Result<(), StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.status_error(table, status, response).await)
        }
    }

    async fn status_error(
        &self,
        table: &str,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> StoreError {
        match status.as_u16() {
            401 | 403 => StoreError::Unauthorized,
            404 => StoreError::UnknownTable(table.to_string()),
            _ => {
                let text = response.text().await.unwrap_or_default();
                StoreError::Api(format!("{}: {}", status, text))
            }
        }
    }
}
