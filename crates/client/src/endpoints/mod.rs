//! REST endpoint bindings, one module per resource.

pub mod adherents;
pub mod auth;
pub mod profile;
pub mod reports;
pub mod subscriptions;
pub mod users;

use clubdesk_core::Page;
use serde::Deserialize;

/// Some list endpoints come back either paginated or as a bare array depending on the
/// server version.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListOrPage<T> {
    Page(Page<T>),
    List(Vec<T>),
}

impl<T> From<ListOrPage<T>> for Page<T> {
    fn from(value: ListOrPage<T>) -> Self {
        match value {
            ListOrPage::Page(page) => page,
            ListOrPage::List(items) => Page::single(items),
        }
    }
}
