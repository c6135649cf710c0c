//! Read-only statistics returned by the reporting endpoints.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralStatistics {
    pub total_adherents: u64,
    pub active_adherents: u64,
    pub suspended_adherents: u64,
    pub expired_adherents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub subscriber_count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatistics {
    pub total_revenue: f64,
    #[serde(default)]
    pub subscription_details: BTreeMap<String, SubscriptionDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub new_adherents: u64,
    pub active_members: u64,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
}

/// Adherent counts keyed by status name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_separates_timestamp_from_counts() {
        let json = serde_json::json!({
            "ACTIVE": 10,
            "EXPIRED": 2,
            "SUSPENDED": 1,
            "DEACTIVATED": 0,
            "generatedAt": "2024-05-01T08:00:00"
        });
        let report: StatusReport = serde_json::from_value(json).unwrap();
        assert!(report.generated_at.is_some());
        assert_eq!(report.counts.len(), 4);
        assert_eq!(report.counts["ACTIVE"], 10);
    }

    #[test]
    fn subscription_statistics_keep_per_type_details() {
        let json = serde_json::json!({
            "totalRevenue": 150.0,
            "subscriptionDetails": {
                "BASIC": {"type": "BASIC", "price": 25.0, "subscriberCount": 6, "revenue": 150.0}
            }
        });
        let stats: SubscriptionStatistics = serde_json::from_value(json).unwrap();
        assert_eq!(stats.subscription_details["BASIC"].subscriber_count, 6);
    }
}
