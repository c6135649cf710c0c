//! Adherent (club member) records and the payloads used to create or edit them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::require;
use crate::{AdherentId, DomainError, DomainResult, Entity, Subscription};

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdherentStatus {
    Active,
    Expired,
    Suspended,
    Deactivated,
}

impl AdherentStatus {
    pub const ALL: [AdherentStatus; 4] = [
        AdherentStatus::Active,
        AdherentStatus::Expired,
        AdherentStatus::Suspended,
        AdherentStatus::Deactivated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdherentStatus::Active => "ACTIVE",
            AdherentStatus::Expired => "EXPIRED",
            AdherentStatus::Suspended => "SUSPENDED",
            AdherentStatus::Deactivated => "DEACTIVATED",
        }
    }
}

impl core::fmt::Display for AdherentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AdherentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown adherent status '{s}'")))
    }
}

/// A club member as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adherent {
    pub id: AdherentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub status: AdherentStatus,
    #[serde(default)]
    pub current_subscription: Option<Subscription>,
    /// Base64-encoded document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_certificate: Option<String>,
    #[serde(default)]
    pub medical_certificate_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub suspended_reason: Option<String>,
    #[serde(default)]
    pub suspended_date: Option<NaiveDateTime>,
}

impl Adherent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// `true` when a certificate expiry date is known and lies before `today`.
    pub fn certificate_expired(&self, today: NaiveDate) -> bool {
        self.medical_certificate_expiry_date
            .is_some_and(|expiry| expiry < today)
    }
}

impl Entity for Adherent {
    type Id = AdherentId;

    fn id(&self) -> AdherentId {
        self.id
    }
}

/// Payload for registering a new adherent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherentCreateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    /// Base64-encoded document.
    pub medical_certificate: String,
    pub medical_certificate_expiry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AdherentStatus>,
}

impl AdherentCreateRequest {
    /// Check required fields before the request is submitted.
    pub fn validate(&self) -> DomainResult<()> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require("email", &self.email)?;
        require("phoneNumber", &self.phone_number)?;
        require("address", &self.address)?;
        require("medicalCertificate", &self.medical_certificate)?;
        check_email(&self.email)
    }
}

/// Partial update of an adherent; absent fields are left untouched by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherentUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AdherentUpdateRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        if let Some(first_name) = &self.first_name {
            require("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require("lastName", last_name)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
            check_email(email)?;
        }
        Ok(())
    }
}

/// Contact details the signed-in user may edit on their own profile.
/// Identity fields stay with the back office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        if let Some(email) = &self.email {
            require("email", email)?;
            check_email(email)?;
        }
        Ok(())
    }
}

/// Password change for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> DomainResult<()> {
        require("oldPassword", &self.old_password)?;
        require("newPassword", &self.new_password)?;
        if self.old_password == self.new_password {
            return Err(DomainError::validation("new password must differ from the old one"));
        }
        Ok(())
    }
}

fn check_email(email: &str) -> DomainResult<()> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::validation(format!("'{email}' is not a valid email"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> AdherentCreateRequest {
        AdherentCreateRequest {
            first_name: "Alice".to_string(),
            last_name: "Martin".to_string(),
            email: "alice@club.fr".to_string(),
            phone_number: "+33612345678".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            address: "1 rue du Stade".to_string(),
            city: "Lyon".to_string(),
            postal_code: "69000".to_string(),
            country: "France".to_string(),
            medical_certificate: "JVBERi0xLjQK".to_string(),
            medical_certificate_expiry_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            status: None,
        }
    }

    #[test]
    fn complete_create_request_is_valid() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn create_request_reports_first_missing_field() {
        let mut req = create_request();
        req.phone_number = " ".to_string();
        req.address = String::new();
        assert_eq!(req.validate(), Err(DomainError::MissingField("phoneNumber")));
    }

    #[test]
    fn create_request_requires_a_certificate() {
        let mut req = create_request();
        req.medical_certificate.clear();
        assert_eq!(req.validate(), Err(DomainError::MissingField("medicalCertificate")));
    }

    #[test]
    fn create_request_checks_email_shape() {
        let mut req = create_request();
        req.email = "alice.club.fr".to_string();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn empty_update_is_rejected() {
        let update = AdherentUpdateRequest::default();
        assert!(update.is_empty());
        assert_eq!(update.validate(), Err(DomainError::validation("nothing to update")));
    }

    #[test]
    fn update_only_serializes_present_fields() {
        let update = AdherentUpdateRequest {
            city: Some("Paris".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"city": "Paris"}));
    }

    #[test]
    fn profile_update_carries_contact_fields_only() {
        let update = ProfileUpdate {
            phone_number: Some("+33600000000".to_string()),
            postal_code: Some("75001".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"phoneNumber": "+33600000000", "postalCode": "75001"})
        );

        let renamed: ProfileUpdate =
            serde_json::from_value(serde_json::json!({"firstName": "Eve", "city": "Nice"})).unwrap();
        assert_eq!(serde_json::to_value(&renamed).unwrap(), serde_json::json!({"city": "Nice"}));
    }

    #[test]
    fn profile_update_rejects_empty_or_bad_email() {
        assert_eq!(ProfileUpdate::default().validate(), Err(DomainError::validation("nothing to update")));
        let bad = ProfileUpdate {
            email: Some("nobody".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn password_change_must_differ() {
        let same = PasswordChange {
            old_password: "secret".to_string(),
            new_password: "secret".to_string(),
        };
        assert!(same.validate().is_err());

        let missing = PasswordChange {
            old_password: String::new(),
            new_password: "next".to_string(),
        };
        assert_eq!(missing.validate(), Err(DomainError::MissingField("oldPassword")));
    }

    #[test]
    fn adherent_tolerates_sparse_payloads() {
        let json = serde_json::json!({
            "id": 9,
            "firstName": "Bob",
            "lastName": "",
            "email": "bob@club.local",
            "dateOfBirth": "2000-01-01",
            "status": "SUSPENDED",
            "suspendedReason": "unpaid",
            "medicalCertificateExpiryDate": "2024-01-31",
            "createdAt": "2024-01-02T10:15:30.123"
        });
        let adherent: Adherent = serde_json::from_value(json).unwrap();
        assert_eq!(adherent.id(), AdherentId::new(9));
        assert_eq!(adherent.full_name(), "Bob");
        assert_eq!(adherent.status, AdherentStatus::Suspended);
        assert!(adherent.current_subscription.is_none());
        assert!(adherent.certificate_expired(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(!adherent.certificate_expired(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in AdherentStatus::ALL {
            assert_eq!(status.as_str().parse::<AdherentStatus>().unwrap(), status);
        }
        assert_eq!("active".parse::<AdherentStatus>().unwrap(), AdherentStatus::Active);
    }
}
