//! `/users`: role administration.

use clubdesk_core::{BulkDisable, BulkRoleChange, DomainError, RoleAssignment, RoleChange, RoleHierarchy};
use reqwest::Method;

use crate::client::segment;
use crate::{ApiClient, ApiResult};

fn require_username(username: &str) -> Result<&str, DomainError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::MissingField("username"));
    }
    Ok(username)
}

impl ApiClient {
    pub async fn assign_role(&self, username: &str, assignment: &RoleAssignment) -> ApiResult<()> {
        let username = require_username(username)?;
        assignment.validate()?;
        let path = format!("/users/{}/role", segment(username));
        self.call_empty(Method::PUT, &path, |req| req.json(assignment))
            .await
    }

    pub async fn bulk_assign_role(&self, change: &BulkRoleChange) -> ApiResult<()> {
        change.validate()?;
        self.call_empty(Method::POST, "/users/roles/bulk", |req| req.json(change))
            .await
    }

    pub async fn bulk_disable(&self, request: &BulkDisable) -> ApiResult<()> {
        request.validate()?;
        self.call_empty(Method::POST, "/users/disable/bulk", |req| req.json(request))
            .await
    }

    pub async fn role_hierarchy(&self) -> ApiResult<RoleHierarchy> {
        self.call(Method::GET, "/users/roles/hierarchy", |req| req)
            .await
    }

    pub async fn role_history(&self, username: &str) -> ApiResult<Vec<RoleChange>> {
        let username = require_username(username)?;
        let path = format!("/users/{}/roles/history", segment(username));
        self.call(Method::GET, &path, |req| req).await
    }
}
