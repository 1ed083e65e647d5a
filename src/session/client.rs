use chrono::{Duration, Utc};
use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use super::error::SessionError;
use super::{Identity, Session};
use crate::config::AppConfig;

/// Client for the backend's GoTrue-style auth endpoints. Only the flows the
/// CLI needs: password sign-in, sign-up, and token revocation. Everything
/// else about account management lives on the hosted side.
pub struct AuthClient {
    client: Client,
    base: Url,
    anon_key: String,
}

/// What a sign-up produced. Backends configured to auto-confirm hand back a
/// live session; otherwise the account sits pending email confirmation.
#[derive(Debug)]
pub enum SignUpOutcome {
    Active(Session),
    ConfirmationRequired,
}

impl AuthClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, SessionError> {
        let base = Url::parse(&config.backend.url)
            .map_err(|e| SessionError::InvalidBaseUrl(format!("{}: {}", config.backend.url, e)))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.http.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            anon_key: config.backend.anon_key.clone(),
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        tracing::debug!(email, "signing in");

        let mut url = self.auth_url("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = Self::check(response).await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(token.into_session())
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SessionError> {
        tracing::debug!(email, "registering");

        let url = self.auth_url("signup")?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = Self::check(response).await?;

        // Auto-confirming backends answer with a full token grant; others
        // answer with the pending user record.
        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(token) => Ok(SignUpOutcome::Active(token.into_session())),
            Err(_) => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    /// Revoke the session's token. Callers treat failures as non-fatal; the
    /// local cache is cleared either way.
    pub async fn sign_out(&self, session: &Session) -> Result<(), SessionError> {
        tracing::debug!(user = %session.user.id, "signing out");

        let url = self.auth_url("logout")?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", session.access_token),
            )
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    fn auth_url(&self, path: &str) -> Result<Url, SessionError> {
        self.base
            .join(&format!("auth/v1/{}", path))
            .map_err(|e| SessionError::InvalidBaseUrl(format!("{}: {}", self.base, e)))
    }

    async fn check(response: Response) -> Result<String, SessionError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        let message = decode_error_message(&body).unwrap_or_else(|| {
            format!("auth request failed with status {}", status.as_u16())
        });
        Err(SessionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
            user: Identity {
                id: self.user.id,
                email: self.user.email.unwrap_or_default(),
            },
        }
    }
}

/// GoTrue error payloads come in a few shapes depending on version; take
/// whichever message field is present.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

fn decode_error_message(body: &str) -> Option<String> {
    let parsed: AuthErrorBody = serde_json::from_str(body).ok()?;
    parsed.error_description.or(parsed.msg).or(parsed.error)
}
