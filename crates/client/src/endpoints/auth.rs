//! `/auth/...`: login and registration.

use clubdesk_core::DomainError;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{ApiClient, ApiError, ApiResult};

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// `{token}` returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct RawAuthResponse {
    #[serde(default)]
    token: Option<String>,
}

impl ApiClient {
    /// `POST /auth/login`. On success the token is stored.
    ///
    /// A 401 here is reported as [`ApiError::Unauthorized`] and does not expire the
    /// session.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.authenticate("/auth/login", username, password).await
    }

    /// `POST /auth/register`. On success the token is stored.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.authenticate("/auth/register", username, password).await
    }

    /// `POST /auth/admin/register`. On success the token is stored.
    pub async fn register_admin(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.authenticate("/auth/admin/register", username, password).await
    }

    /// Forget the stored credential. Purely local; the API keeps no session.
    pub fn logout(&self) -> ApiResult<()> {
        self.credentials().clear()?;
        tracing::info!("credential cleared");
        Ok(())
    }

    async fn authenticate(&self, path: &str, username: &str, password: &str) -> ApiResult<AuthResponse> {
        if username.trim().is_empty() {
            return Err(DomainError::MissingField("username").into());
        }
        if password.is_empty() {
            return Err(DomainError::MissingField("password").into());
        }

        let body = AuthRequest {
            username: username.trim(),
            password,
        };
        let raw: RawAuthResponse = self.call(Method::POST, path, |req| req.json(&body)).await?;

        let token = raw
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Parse(format!("{path}: response carried no token")))?;

        self.credentials().set(&token)?;
        tracing::info!(username = body.username, "authenticated");
        Ok(AuthResponse { token })
    }
}
