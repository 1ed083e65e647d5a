use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use super::error::StoreError;
use super::query::{validate_column, Query, SortDirection};
use super::GoalStore;
use crate::config::AppConfig;
use crate::session::Session;
use crate::types::{Goal, GoalDraft};

/// `GoalStore` over the backend's PostgREST data API.
///
/// Every request carries the project `apikey` plus the session's bearer
/// token; the backend's row-level security decides what the token may see.
/// Mutations ask for their representation back (`Prefer:
/// return=representation`) so "matched nothing" is distinguishable from
/// success.
pub struct RestStore {
    client: Client,
    endpoint: Url,
    anon_key: String,
    access_token: String,
}

impl RestStore {
    pub fn from_config(config: &AppConfig, session: &Session) -> Result<Self, StoreError> {
        validate_column(&config.backend.goals_relation)?;

        let base = Url::parse(&config.backend.url)
            .map_err(|e| StoreError::InvalidBaseUrl(format!("{}: {}", config.backend.url, e)))?;
        let endpoint = base
            .join(&format!("rest/v1/{}", config.backend.goals_relation))
            .map_err(|e| StoreError::InvalidBaseUrl(format!("{}: {}", config.backend.url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            anon_key: config.backend.anon_key.clone(),
            access_token: session.access_token.clone(),
        })
    }

    fn request(&self, method: Method, query: &Query) -> RequestBuilder {
        let mut request = self.client.request(method, self.endpoint.clone());
        if !query.pairs().is_empty() {
            request = request.query(query.pairs());
        }
        request
            .header("apikey", &self.anon_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.access_token),
            )
    }

    /// Decode the row set from a response, converting a non-2xx status into
    /// the backend's own error message.
    async fn rows(response: Response) -> Result<Vec<Goal>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    format!("store request failed with status {}", status.as_u16())
                });
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let rows = serde_json::from_slice(&bytes)?;
        Ok(rows)
    }
}

/// PostgREST error payload; only the message matters to us.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[async_trait]
impl GoalStore for RestStore {
    async fn select_owned(&self, owner: Uuid) -> Result<Vec<Goal>, StoreError> {
        tracing::debug!(%owner, "selecting goals");

        let query = Query::new()
            .select_all()
            .eq("user_id", owner)?
            .order("created_at", SortDirection::Desc)?;

        let response = self.request(Method::GET, &query).send().await?;
        Self::rows(response).await
    }

    async fn insert(&self, draft: GoalDraft) -> Result<Goal, StoreError> {
        tracing::debug!(owner = %draft.user_id, "inserting goal");

        let query = Query::new().select_all();
        let response = self
            .request(Method::POST, &query)
            .header("Prefer", "return=representation")
            .json(&draft)
            .send()
            .await?;

        let rows = Self::rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::EmptyResponse)
    }

    async fn set_completed(
        &self,
        id: Uuid,
        owner: Uuid,
        completed: bool,
    ) -> Result<Goal, StoreError> {
        tracing::debug!(%id, %owner, completed, "updating goal");

        let query = Query::new()
            .select_all()
            .eq("id", id)?
            .eq("user_id", owner)?;
        let response = self
            .request(Method::PATCH, &query)
            .header("Prefer", "return=representation")
            .json(&json!({ "completed": completed }))
            .send()
            .await?;

        let rows = Self::rows(response).await?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::NotFound(format!("goal {} not found for this account", id))
        })
    }

    async fn remove(&self, id: Uuid, owner: Uuid) -> Result<(), StoreError> {
        tracing::debug!(%id, %owner, "deleting goal");

        let query = Query::new()
            .select_all()
            .eq("id", id)?
            .eq("user_id", owner)?;
        let response = self
            .request(Method::DELETE, &query)
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows = Self::rows(response).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!(
                "goal {} not found for this account",
                id
            )));
        }
        Ok(())
    }
}
