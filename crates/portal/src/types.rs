//! Wire types exchanged with the account/auth service.

use serde::{Deserialize, Serialize};

use wework_auth::Sex;
use wework_core::{DomainError, DomainResult};

pub use wework_auth::{MyAuthorities, Profile};

/// Login credentials. Transient: never persisted, dropped after the call.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub login_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_id: login_id.into(),
            password: password.into(),
        }
    }

    /// A non-blank login ID and a non-empty password. Whitespace is a valid
    /// password character.
    pub fn is_complete(&self) -> bool {
        !self.login_id.trim().is_empty() && !self.password.is_empty()
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque access token proving an authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Body of a successful `POST /api/auth/login`.
///
/// The service also returns `expiresIn` and a user summary; the client keeps
/// only the token and re-reads the profile separately.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: SessionToken,
}

/// Body of `PUT /api/account/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub birthday: String,
    pub email: String,
    pub sex: Sex,
}

/// Body of `PUT /api/account/me/password`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPw")]
    old_password: String,
    #[serde(rename = "newPw")]
    new_password: String,
}

impl ChangePasswordRequest {
    pub const MIN_LEN: usize = 8;
    pub const MAX_LEN: usize = 64;

    pub fn new(old_password: impl Into<String>, new_password: impl Into<String>) -> DomainResult<Self> {
        let old_password = old_password.into();
        let new_password = new_password.into();

        if old_password.trim().is_empty() {
            return Err(DomainError::validation("current password is required"));
        }
        let len = new_password.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(DomainError::validation(format!(
                "new password must be {}-{} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }

        Ok(Self {
            old_password,
            new_password,
        })
    }
}

impl core::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ChangePasswordRequest(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_in_camel_case_and_redact_debug() {
        let creds = Credentials::new("alice", "s3cret");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({"loginId": "alice", "password": "s3cret"}));
        assert!(!format!("{creds:?}").contains("s3cret"));
    }

    #[test]
    fn incomplete_credentials() {
        assert!(!Credentials::new("  ", "pw").is_complete());
        assert!(!Credentials::new("alice", "").is_complete());
        assert!(Credentials::new("alice", "   ").is_complete());
        assert!(Credentials::new("alice", "pw").is_complete());
    }

    #[test]
    fn login_response_ignores_extra_fields() {
        let body = r#"{"accessToken":"abc","expiresIn":3600,"user":{"empId":1}}"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.access_token.as_str(), "abc");
        assert_eq!(format!("{:?}", resp.access_token), "SessionToken(<redacted>)");
    }

    #[test]
    fn update_request_wire_shape() {
        let req = UpdateProfileRequest {
            name: "Bob".to_string(),
            birthday: "1990-01-01".to_string(),
            email: "b@x.com".to_string(),
            sex: Sex::Female,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Bob", "birthday": "1990-01-01", "email": "b@x.com", "sex": "F"})
        );
    }

    #[test]
    fn change_password_validation() {
        assert!(ChangePasswordRequest::new("", "longenough").is_err());
        assert!(ChangePasswordRequest::new("old", "short").is_err());
        assert!(ChangePasswordRequest::new("old", "x".repeat(65)).is_err());

        let req = ChangePasswordRequest::new("old", "longenough").unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"oldPw": "old", "newPw": "longenough"}));
    }
}
