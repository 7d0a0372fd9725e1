use crate::config::Settings;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin adapter over the hosted auth provider (GoTrue-compatible REST API).
/// All user identity comes from here; the rest of the system only ever sees
/// the resolved `AuthUser`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl AuthClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_supabase_url()?.to_string();
        let api_key = settings.require_supabase_service_role_key()?.to_string();

        let timeout_secs = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build auth http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url.trim_end_matches('/'), path)
    }

    fn base_headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        Ok(headers)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<serde_json::Value> {
        let res = self
            .http
            .post(self.endpoint("/signup"))
            .headers(self.base_headers()?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("auth provider signup request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read signup response")?;
        if !status.is_success() {
            anyhow::bail!("auth provider signup HTTP {status}: {text}");
        }

        serde_json::from_str(&text).context("signup response is not valid JSON")
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        let res = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .headers(self.base_headers()?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("auth provider sign-in request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read sign-in response")?;
        if !status.is_success() {
            anyhow::bail!("auth provider sign-in HTTP {status}: {text}");
        }

        serde_json::from_str::<Session>(&text).context("sign-in response is not a session")
    }

    pub async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        let mut headers = self.base_headers()?;
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        );

        let res = self
            .http
            .post(self.endpoint("/logout"))
            .headers(headers)
            .send()
            .await
            .context("auth provider sign-out request failed")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("auth provider sign-out HTTP {status}: {text}");
        }
        Ok(())
    }

    /// Resolve the user behind a bearer token. `Ok(None)` means the token was
    /// rejected by the provider; errors are infrastructure failures.
    pub async fn current_user(&self, access_token: &str) -> anyhow::Result<Option<AuthUser>> {
        let mut headers = self.base_headers()?;
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        );

        let res = self
            .http
            .get(self.endpoint("/user"))
            .headers(headers)
            .send()
            .await
            .context("auth provider user lookup failed")?;

        let status = res.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }

        let text = res
            .text()
            .await
            .context("failed to read user lookup response")?;
        if !status.is_success() {
            anyhow::bail!("auth provider user lookup HTTP {status}: {text}");
        }

        let user = serde_json::from_str::<AuthUser>(&text)
            .with_context(|| format!("user lookup response is not a user object: {text}"))?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_parses_provider_shape() {
        let text = r#"{
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": "0e4f3a94-9c1f-4f7a-9b6e-0c7a6d3e2b10", "email": "p@example.com"}
        }"#;
        let session: Session = serde_json::from_str(text).unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.user.email.as_deref(), Some("p@example.com"));
    }

    #[test]
    fn user_parses_without_email() {
        let user: AuthUser =
            serde_json::from_str(r#"{"id": "0e4f3a94-9c1f-4f7a-9b6e-0c7a6d3e2b10"}"#).unwrap();
        assert_eq!(user.email, None);
    }
}
