//! View gate: which screens render for which role.
//!
//! - No IO
//! - No panics
//! - No hidden state (re-evaluated on every render)

use serde::{Deserialize, Serialize};

use crate::Role;

/// Screens of the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Member list (landing view).
    List,
    /// New member form.
    Form,
    /// Member details.
    Details,
    /// Member edit form.
    Edit,
    /// The signed-in user's own profile.
    Profile,
    Reports,
    Subscriptions,
    /// Role administration.
    Users,
}

impl View {
    pub const ALL: [View; 8] = [
        View::List,
        View::Form,
        View::Details,
        View::Edit,
        View::Profile,
        View::Reports,
        View::Subscriptions,
        View::Users,
    ];

    /// Where a fresh or reset session lands.
    pub const fn landing() -> Self {
        View::List
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::List => "list",
            View::Form => "form",
            View::Details => "details",
            View::Edit => "edit",
            View::Profile => "profile",
            View::Reports => "reports",
            View::Subscriptions => "subscriptions",
            View::Users => "users",
        }
    }

    /// Member-management screens answer a denial with an explicit panel; the others
    /// simply do not render.
    fn is_member_management(&self) -> bool {
        matches!(self, View::List | View::Form | View::Details | View::Edit)
    }
}

impl core::fmt::Display for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of gating a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum GateDecision {
    Allow,
    /// Render the access-denied panel with a link to `back_to`.
    AccessDenied { back_to: View },
    /// Render nothing.
    Hidden,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

/// Role a view requires, if any.
pub fn required_role(view: View) -> Option<Role> {
    match view {
        View::Profile => None,
        _ => Some(Role::Admin),
    }
}

/// Decide whether `view` renders for `role`.
///
/// A missing role (no credential, undecodable claims, or no `role` claim) is treated
/// like any non-admin role.
pub fn gate(view: View, role: Option<Role>) -> GateDecision {
    let Some(required) = required_role(view) else {
        return GateDecision::Allow;
    };

    if role == Some(required) {
        GateDecision::Allow
    } else if view.is_member_management() {
        GateDecision::AccessDenied { back_to: View::Profile }
    } else {
        GateDecision::Hidden
    }
}
