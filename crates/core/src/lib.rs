//! `clubdesk-core` — club domain records shared by the client and the console.
//!
//! This crate contains **pure data** (no IO): identifiers, wire records for the REST
//! API, and the client-side validation applied before anything is submitted.

pub mod adherent;
pub mod entity;
pub mod error;
pub mod id;
pub mod page;
pub mod report;
pub mod subscription;
pub mod user;

pub use adherent::{
    Adherent, AdherentCreateRequest, AdherentStatus, AdherentUpdateRequest, PasswordChange,
    ProfileUpdate,
};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AdherentId, SubscriptionId};
pub use page::{Page, PageRequest};
pub use report::{GeneralStatistics, MonthlyReport, StatusReport, SubscriptionDetail, SubscriptionStatistics};
pub use subscription::{Subscription, SubscriptionRequest, SubscriptionType};
pub use user::{BulkDisable, BulkRoleChange, RoleAssignment, RoleChange, RoleHierarchy};
