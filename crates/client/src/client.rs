//! API client with the session-expiry interceptor.

use std::sync::Arc;

use clubdesk_auth::{Claims, read_claims};
use clubdesk_events::{SessionSignal, SessionSignals, SignalBus};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ApiError, ApiResult, ClientConfig, CredentialStore};

/// Client for the club REST API.
///
/// Every request carries `Authorization: Bearer <token>` when the credential store holds
/// one. Every response is inspected: a 401 from anything but the `/auth/...` endpoints
/// clears the store, publishes [`SessionSignal::Expired`] and fails the call with
/// [`ApiError::SessionExpired`], so deep call sites only handle their own error while
/// the session owner learns about the expiry through the signal.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    signals: Arc<SessionSignals>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        signals: Arc<SessionSignals>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            credentials,
            signals,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn signals(&self) -> &Arc<SessionSignals> {
        &self.signals
    }

    /// Claims of the stored credential, if there is one and it decodes.
    pub fn current_claims(&self) -> Option<Claims> {
        read_claims(self.credentials.get().as_deref())
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn call<T>(
        &self,
        method: Method,
        path: &str,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.dispatch(method, path, prepare).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(format!("{path}: {e}")))
    }

    /// Send a request whose body, if any, is irrelevant.
    pub(crate) async fn call_empty(
        &self,
        method: Method,
        path: &str,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<()> {
        self.dispatch(method, path, prepare).await.map(drop)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = self.credentials.get() {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%method, path, "dispatching request");
        let response = prepare(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.intercept(path, response).await
    }

    async fn intercept(&self, path: &str, response: Response) -> ApiResult<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if is_auth_endpoint(path) {
                return Err(ApiError::Unauthorized);
            }
            self.expire_session(path);
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let message = error_message(status, response).await;
            tracing::debug!(path, status = status.as_u16(), %message, "request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    fn expire_session(&self, path: &str) {
        tracing::info!(path, "credential rejected by the API; expiring session");

        if let Err(err) = self.credentials.clear() {
            tracing::warn!(error = %err, "failed to clear rejected credential");
        }
        if let Err(err) = self.signals.publish(SessionSignal::Expired) {
            tracing::warn!(error = %err, "failed to publish session expiry");
        }
    }
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_present())
            .finish()
    }
}

/// `/auth/login`, `/auth/register`, `/auth/admin/register`: a 401 there means bad
/// credentials, not an expired session.
pub(crate) fn is_auth_endpoint(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path == "/auth" || path.starts_with("/auth/")
}

/// Best human-readable message from an error response.
async fn error_message(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_owned))
        });

    from_json
        .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
