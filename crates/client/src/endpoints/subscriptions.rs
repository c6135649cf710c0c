//! `/subscriptions`: subscription offers.

use clubdesk_core::{DomainError, Page, PageRequest, Subscription, SubscriptionId, SubscriptionRequest, SubscriptionType};
use reqwest::Method;

use crate::endpoints::ListOrPage;
use crate::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn list_subscriptions(&self, page: PageRequest) -> ApiResult<Page<Subscription>> {
        let list: ListOrPage<Subscription> = self
            .call(Method::GET, "/subscriptions", |req| req.query(&page.query()))
            .await?;
        Ok(list.into())
    }

    pub async fn subscription(&self, id: SubscriptionId) -> ApiResult<Subscription> {
        self.call(Method::GET, &format!("/subscriptions/{id}"), |req| req)
            .await
    }

    /// The offer for one subscription type; the API keeps a single offer per type.
    pub async fn subscription_by_type(&self, kind: SubscriptionType) -> ApiResult<Subscription> {
        let path = format!("/subscriptions/type/{}", kind.as_str());
        self.call(Method::GET, &path, |req| req).await
    }

    pub async fn available_subscription_types(&self) -> ApiResult<Vec<SubscriptionType>> {
        self.call(Method::GET, "/subscriptions/types/available", |req| req)
            .await
    }

    pub async fn create_subscription(&self, request: &SubscriptionRequest) -> ApiResult<Subscription> {
        request.validate()?;
        self.call(Method::POST, "/subscriptions", |req| req.json(request))
            .await
    }

    pub async fn update_subscription(
        &self,
        id: SubscriptionId,
        request: &SubscriptionRequest,
    ) -> ApiResult<Subscription> {
        request.validate()?;
        self.call(Method::PUT, &format!("/subscriptions/{id}"), |req| req.json(request))
            .await
    }

    pub async fn update_subscription_price(&self, id: SubscriptionId, price: f64) -> ApiResult<Subscription> {
        if !(price.is_finite() && price > 0.0) {
            return Err(DomainError::validation("price must be positive").into());
        }
        self.call(Method::PATCH, &format!("/subscriptions/{id}/price"), |req| {
            req.query(&[("price", price)])
        })
        .await
    }

    pub async fn delete_subscription(&self, id: SubscriptionId) -> ApiResult<()> {
        self.call_empty(Method::DELETE, &format!("/subscriptions/{id}"), |req| req)
            .await
    }
}
