//! User account and role administration payloads.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::require;
use crate::{DomainError, DomainResult};

/// Body of `PUT /users/{username}/role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: String,
}

impl RoleAssignment {
    pub fn validate(&self) -> DomainResult<()> {
        require("role", &self.role)
    }
}

/// Assign one role to several users at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRoleChange {
    pub usernames: Vec<String>,
    pub role: String,
}

impl BulkRoleChange {
    pub fn validate(&self) -> DomainResult<()> {
        require("role", &self.role)?;
        require_usernames(&self.usernames)
    }
}

/// Disable several user accounts at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDisable {
    pub usernames: Vec<String>,
}

impl BulkDisable {
    pub fn validate(&self) -> DomainResult<()> {
        require_usernames(&self.usernames)
    }
}

/// Role name → roles it inherits.
pub type RoleHierarchy = BTreeMap<String, Vec<String>>;

/// One entry of a user's role history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub username: String,
    #[serde(default)]
    pub previous_role: Option<String>,
    pub new_role: String,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub changed_at: Option<NaiveDateTime>,
}

fn require_usernames(usernames: &[String]) -> DomainResult<()> {
    if usernames.is_empty() {
        return Err(DomainError::MissingField("usernames"));
    }
    usernames.iter().try_for_each(|name| require("usernames", name))
}
