//! `/profile`: the signed-in user's own record.

use clubdesk_core::{Adherent, PasswordChange, ProfileUpdate};
use reqwest::Method;
use serde::Deserialize;

use crate::{ApiClient, ApiResult};

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    pub async fn profile(&self) -> ApiResult<Adherent> {
        self.call(Method::GET, "/profile", |req| req).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Adherent> {
        update.validate()?;
        self.call(Method::PUT, "/profile", |req| req.json(update)).await
    }

    /// Returns the server's confirmation message.
    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<String> {
        change.validate()?;
        let response: MessageResponse = self
            .call(Method::PUT, "/profile/password", |req| req.json(change))
            .await?;
        Ok(response
            .message
            .unwrap_or_else(|| "password changed".to_string()))
    }
}
