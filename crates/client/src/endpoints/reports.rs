//! `/reports`: read-only statistics.

use clubdesk_core::{DomainError, GeneralStatistics, MonthlyReport, StatusReport, SubscriptionStatistics};
use reqwest::Method;

use crate::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn general_statistics(&self) -> ApiResult<GeneralStatistics> {
        self.call(Method::GET, "/reports/general-statistics", |req| req)
            .await
    }

    pub async fn subscription_statistics(&self) -> ApiResult<SubscriptionStatistics> {
        self.call(Method::GET, "/reports/subscription-statistics", |req| req)
            .await
    }

    pub async fn adherents_by_status_report(&self) -> ApiResult<StatusReport> {
        self.call(Method::GET, "/reports/adherents-by-status", |req| req)
            .await
    }

    pub async fn monthly_report(&self, year: i32, month: u32) -> ApiResult<MonthlyReport> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!("month must be 1-12, got {month}")).into());
        }
        self.call(Method::GET, &format!("/reports/monthly/{year}/{month}"), |req| req)
            .await
    }
}
