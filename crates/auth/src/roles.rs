use serde::{Deserialize, Serialize};

/// Role carried by the bearer credential.
///
/// The set is closed on purpose: the front-end only distinguishes administrators
/// from everyone else, so any claim other than `ADMIN` maps to [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Map a raw `role` claim onto the closed role set.
    pub fn from_claim(claim: &str) -> Self {
        if claim == "ADMIN" { Role::Admin } else { Role::User }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
