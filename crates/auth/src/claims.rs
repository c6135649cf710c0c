//! Structural decode of bearer credential claims.
//!
//! Note: this never verifies the signature. The result may only be used to decide what
//! the front-end shows; the API is the authority on every request.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Role;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Claims the front-end cares about. Every field is optional: a token that decodes but
/// omits a claim simply yields `None` for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username).
    pub sub: Option<String>,

    /// Raw role claim.
    pub role: Option<String>,

    /// Issued-at, seconds since the epoch.
    pub issued_at: Option<i64>,

    /// Expiry, seconds since the epoch. Informational only; expiry is detected when the
    /// API answers 401.
    pub expires_at: Option<i64>,
}

impl Claims {
    /// The role mapped onto the closed role set.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().map(Role::from_claim)
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Read the claims of a credential.
///
/// Total: an absent credential, anything that is not exactly three dot-separated
/// segments, a payload that is not base64 or not a JSON object all yield `None`.
pub fn read_claims(credential: Option<&str>) -> Option<Claims> {
    let credential = credential?.trim();

    let mut segments = credential.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        tracing::debug!("credential is not a three-segment token");
        return None;
    };

    if payload.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;

    let value: Value = serde_json::from_slice(&bytes).ok()?;
    let object = value.as_object()?;

    let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
    let number = |key: &str| object.get(key).and_then(Value::as_i64);

    Some(Claims {
        sub: text("sub"),
        role: text("role"),
        issued_at: number("iat"),
        expires_at: number("exp"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn token_with_payload(payload: &Value) -> String {
        let header = URL_SAFE_LENIENT.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(payload).unwrap());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn reads_role_and_subject() {
        let token = token_with_payload(&serde_json::json!({
            "sub": "alice",
            "role": "ADMIN",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600
        }));

        let claims = read_claims(Some(&token)).unwrap();
        assert_eq!(claims.subject(), Some("alice"));
        assert_eq!(claims.role(), Some(Role::Admin));
        assert_eq!(claims.issued_at, Some(1_700_000_000));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_003_600);
    }

    #[test]
    fn missing_claims_are_none_not_failure() {
        let token = token_with_payload(&serde_json::json!({"scope": "x"}));
        let claims = read_claims(Some(&token)).unwrap();
        assert_eq!(claims, Claims::default());
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn non_string_role_is_ignored() {
        let token = token_with_payload(&serde_json::json!({"sub": "bob", "role": ["ADMIN"]}));
        let claims = read_claims(Some(&token)).unwrap();
        assert_eq!(claims.role, None);
        assert_eq!(claims.subject(), Some("bob"));
    }

    #[test]
    fn accepts_padded_standard_alphabet_payloads() {
        let payload = base64::engine::general_purpose::STANDARD.encode(br#"{"role":"USER","sub":"zoe"}"#);
        let token = format!("h.{payload}.s");
        let claims = read_claims(Some(&token)).unwrap();
        assert_eq!(claims.role(), Some(Role::User));
    }

    #[test]
    fn absent_credential_has_no_claims() {
        assert_eq!(read_claims(None), None);
    }

    #[test]
    fn two_segment_credential_has_no_claims() {
        assert_eq!(read_claims(Some("bad.token")), None);
    }

    #[test]
    fn malformed_credentials_have_no_claims() {
        let not_json = format!("h.{}.s", URL_SAFE_LENIENT.encode(b"not json"));
        let array = format!("h.{}.s", URL_SAFE_LENIENT.encode(b"[1,2,3]"));
        let cases: [&str; 7] = [
            "",
            "...",
            "a.b.c.d",
            "header..signature",
            "h.!!!!.s",
            &not_json,
            &array,
        ];
        for credential in cases {
            assert_eq!(read_claims(Some(credential)), None, "{credential:?}");
        }
    }

    proptest! {
        /// Property: decoding arbitrary text never panics, and anything that is not
        /// three segments never yields claims.
        #[test]
        fn arbitrary_credentials_never_panic(credential in ".*") {
            let claims = read_claims(Some(&credential));
            if credential.trim().split('.').count() != 3 {
                prop_assert!(claims.is_none());
            }
        }

        #[test]
        fn arbitrary_role_claims_round_trip(role in "[A-Z_]{0,12}", sub in "[a-z]{1,12}") {
            let token = token_with_payload(&serde_json::json!({"role": role, "sub": sub}));
            let claims = read_claims(Some(&token)).unwrap();
            prop_assert_eq!(claims.role(), Some(Role::from_claim(&role)));
            prop_assert_eq!(claims.subject(), Some(sub.as_str()));
        }
    }
}
