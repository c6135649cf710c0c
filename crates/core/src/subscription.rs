//! Subscription offers and the payloads used to manage them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Entity, SubscriptionId};

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    /// Limited to three sessions per week.
    Basic,
    /// Unlimited sessions.
    Premium,
}

impl SubscriptionType {
    pub const ALL: [SubscriptionType; 2] = [SubscriptionType::Basic, SubscriptionType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Basic => "BASIC",
            SubscriptionType::Premium => "PREMIUM",
        }
    }

    /// Weekly session allowance; `None` means unlimited.
    pub fn weekly_sessions(&self) -> Option<u32> {
        match self {
            SubscriptionType::Basic => Some(3),
            SubscriptionType::Premium => None,
        }
    }
}

impl core::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SubscriptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown subscription type '{s}'")))
    }
}

/// A subscription offer as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_sessions_used: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Entity for Subscription {
    type Id = SubscriptionId;

    fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Payload for creating or replacing a subscription offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
}

impl SubscriptionRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(DomainError::validation("price must be positive"));
        }
        if self.end_date < self.start_date {
            return Err(DomainError::validation("end date must not precede start date"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(price: f64, start: NaiveDate, end: NaiveDate) -> SubscriptionRequest {
        SubscriptionRequest {
            kind: SubscriptionType::Basic,
            start_date: start,
            end_date: end,
            price,
        }
    }

    #[test]
    fn basic_is_limited_premium_is_not() {
        assert_eq!(SubscriptionType::Basic.weekly_sessions(), Some(3));
        assert_eq!(SubscriptionType::Premium.weekly_sessions(), None);
    }

    #[test]
    fn parses_type_case_insensitively() {
        assert_eq!("premium".parse::<SubscriptionType>().unwrap(), SubscriptionType::Premium);
        assert!("gold".parse::<SubscriptionType>().is_err());
    }

    #[test]
    fn request_requires_positive_price() {
        let err = request(0.0, date(2024, 1, 1), date(2024, 12, 31)).validate().unwrap_err();
        assert_eq!(err, DomainError::validation("price must be positive"));
        assert!(request(f64::NAN, date(2024, 1, 1), date(2024, 12, 31)).validate().is_err());
    }

    #[test]
    fn request_rejects_inverted_dates() {
        assert!(request(30.0, date(2024, 6, 1), date(2024, 5, 1)).validate().is_err());
        assert!(request(30.0, date(2024, 6, 1), date(2024, 6, 1)).validate().is_ok());
    }

    #[test]
    fn subscription_uses_wire_names() {
        let json = serde_json::json!({
            "id": 3,
            "type": "PREMIUM",
            "startDate": "2024-01-01",
            "endDate": "2024-12-31",
            "price": 49.9,
            "active": true
        });
        let sub: Subscription = serde_json::from_value(json).unwrap();
        assert_eq!(sub.id(), SubscriptionId::new(3));
        assert_eq!(sub.kind, SubscriptionType::Premium);
        assert_eq!(sub.active, Some(true));
        assert_eq!(sub.weekly_sessions_used, None);
    }
}
