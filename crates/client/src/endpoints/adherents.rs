//! `/adherents`: member records, suspension, certificates and subscription assignment.

use chrono::NaiveDate;
use clubdesk_core::{
    Adherent, AdherentCreateRequest, AdherentId, AdherentStatus, AdherentUpdateRequest, DomainError,
    Page, PageRequest, Subscription, SubscriptionType,
};
use reqwest::Method;

use crate::client::segment;
use crate::endpoints::ListOrPage;
use crate::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn list_adherents(&self, page: PageRequest) -> ApiResult<Page<Adherent>> {
        self.call(Method::GET, "/adherents", |req| req.query(&page.query()))
            .await
    }

    pub async fn adherents_by_status(
        &self,
        status: AdherentStatus,
        page: PageRequest,
    ) -> ApiResult<Page<Adherent>> {
        let path = format!("/adherents/status/{}", status.as_str());
        let list: ListOrPage<Adherent> = self.call(Method::GET, &path, |req| req.query(&page.query())).await?;
        Ok(list.into())
    }

    pub async fn adherents_by_subscription_type(
        &self,
        kind: SubscriptionType,
        page: PageRequest,
    ) -> ApiResult<Page<Adherent>> {
        let path = format!("/adherents/subscription-type/{}", kind.as_str());
        let list: ListOrPage<Adherent> = self.call(Method::GET, &path, |req| req.query(&page.query())).await?;
        Ok(list.into())
    }

    pub async fn adherent(&self, id: AdherentId) -> ApiResult<Adherent> {
        self.call(Method::GET, &format!("/adherents/{id}"), |req| req).await
    }

    pub async fn adherent_by_email(&self, email: &str) -> ApiResult<Adherent> {
        if email.trim().is_empty() {
            return Err(DomainError::MissingField("email").into());
        }
        let path = format!("/adherents/email/{}", segment(email.trim()));
        self.call(Method::GET, &path, |req| req).await
    }

    pub async fn search_adherents(&self, name: &str) -> ApiResult<Vec<Adherent>> {
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("name").into());
        }
        self.call(Method::GET, "/adherents/search", |req| req.query(&[("name", name.trim())]))
            .await
    }

    pub async fn create_adherent(&self, request: &AdherentCreateRequest) -> ApiResult<Adherent> {
        request.validate()?;
        self.call(Method::POST, "/adherents", |req| req.json(request)).await
    }

    pub async fn update_adherent(
        &self,
        id: AdherentId,
        update: &AdherentUpdateRequest,
    ) -> ApiResult<Adherent> {
        update.validate()?;
        self.call(Method::PUT, &format!("/adherents/{id}"), |req| req.json(update))
            .await
    }

    /// The API deactivates rather than erases.
    pub async fn delete_adherent(&self, id: AdherentId) -> ApiResult<()> {
        self.call_empty(Method::DELETE, &format!("/adherents/{id}"), |req| req)
            .await
    }

    pub async fn suspend_adherent(&self, id: AdherentId, reason: &str) -> ApiResult<Adherent> {
        if reason.trim().is_empty() {
            return Err(DomainError::MissingField("reason").into());
        }
        self.call(Method::POST, &format!("/adherents/{id}/suspend"), |req| {
            req.query(&[("reason", reason.trim())])
        })
        .await
    }

    pub async fn reactivate_adherent(&self, id: AdherentId) -> ApiResult<Adherent> {
        self.call(Method::POST, &format!("/adherents/{id}/reactivate"), |req| req)
            .await
    }

    pub async fn update_medical_certificate(
        &self,
        id: AdherentId,
        expiry_date: NaiveDate,
    ) -> ApiResult<Adherent> {
        let expiry = expiry_date.format("%Y-%m-%d").to_string();
        self.call(Method::PUT, &format!("/adherents/{id}/medical-certificate"), |req| {
            req.query(&[("expiryDate", expiry.as_str())])
        })
        .await
    }

    /// Posts the full offer; the API stores it and makes it the adherent's current subscription.
    pub async fn assign_subscription(
        &self,
        id: AdherentId,
        subscription: &Subscription,
    ) -> ApiResult<Adherent> {
        self.call(Method::POST, &format!("/adherents/{id}/subscription"), |req| {
            req.json(subscription)
        })
        .await
    }

    pub async fn remove_subscription(&self, id: AdherentId) -> ApiResult<Adherent> {
        self.call(Method::DELETE, &format!("/adherents/{id}/subscription"), |req| req)
            .await
    }

    pub async fn has_active_subscription(&self, id: AdherentId) -> ApiResult<bool> {
        self.call(Method::GET, &format!("/adherents/{id}/has-active-subscription"), |req| req)
            .await
    }

    pub async fn eligible_for_session(&self, id: AdherentId) -> ApiResult<bool> {
        self.call(Method::GET, &format!("/adherents/{id}/eligible-for-session"), |req| req)
            .await
    }

    /// Weekly allowance; the API reports "unlimited" as `i32::MAX`.
    pub async fn weekly_session_limit(&self, id: AdherentId) -> ApiResult<i64> {
        self.call(Method::GET, &format!("/adherents/{id}/weekly-session-limit"), |req| req)
            .await
    }
}
