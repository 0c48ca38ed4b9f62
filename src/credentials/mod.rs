//! Credential Service
//!
//! Client side of the mock `/users` API. The service only stores and lists
//! accounts; deciding whether a login matches happens here in
//! [`CredentialService::authenticate`].

mod memory;

#[cfg(feature = "native")]
mod http;

pub use memory::InMemoryCredentialService;

#[cfg(feature = "native")]
pub use http::{HttpCredentialService, HttpCredentialConfig};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::session::SessionUser;

/// Token stored when the service does not issue one
pub const PLACEHOLDER_TOKEN: &str = "mock-generated-token-on-login";

/// Account record as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Whether this record is the account for the given credentials
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
            && self.password.as_deref() == Some(password)
    }

    /// Session copy of the record; the password is dropped.
    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            token: self
                .token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_TOKEN.to_string()),
        }
    }
}

/// Ids are strings in `json-server` style stores and numbers in others.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        }),
    )
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        }
    }
}

/// Errors talking to the credential service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Email already registered")]
    Conflict,

    #[error("Credential service error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Credential service unreachable: {0}")]
    Transport(String),

    #[error("Invalid credential service response: {0}")]
    Decode(String),
}

/// Account lookup and creation
#[async_trait(?Send)]
pub trait CredentialService {
    /// `GET /users?email=&password=`
    async fn find_users(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, CredentialError>;

    /// `POST /users`
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, CredentialError>;

    /// Look the account up and verify it. `Ok(None)` means bad credentials.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, CredentialError> {
        let records = self.find_users(email, password).await?;
        Ok(records
            .into_iter()
            .find(|record| record.matches(email, password))
            .map(UserRecord::into_session_user))
    }
}

/// `{base}/users`
pub fn users_url(base_url: &str) -> String {
    format!("{}/users", base_url.trim_end_matches('/'))
}

/// `email=..&password=..`, percent-encoded
pub fn users_query(email: &str, password: &str) -> String {
    format!(
        "email={}&password={}",
        urlencoding::encode(email),
        urlencoding::encode(password)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let numeric: UserRecord =
            serde_json::from_str(r#"{"id": 7, "email": "a@b.co", "fullName": "A"}"#).unwrap();
        assert_eq!(numeric.id.as_deref(), Some("7"));

        let text: UserRecord =
            serde_json::from_str(r#"{"id": "3f2a", "email": "a@b.co", "fullName": "A"}"#).unwrap();
        assert_eq!(text.id.as_deref(), Some("3f2a"));

        let missing: UserRecord = serde_json::from_str(r#"{"email": "a@b.co"}"#).unwrap();
        assert_eq!(missing.id, None);
        assert_eq!(missing.full_name, "");
    }

    #[test]
    fn test_into_session_user_drops_password_and_fills_token() {
        let record = UserRecord {
            id: Some("1".into()),
            email: "john@example.com".into(),
            full_name: "John Doe".into(),
            password: Some("secret1".into()),
            token: None,
            created_at: None,
        };
        let user = record.into_session_user();
        assert_eq!(user.token, PLACEHOLDER_TOKEN);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret1"));
        assert!(json.contains("\"fullName\":\"John Doe\""));
    }

    #[test]
    fn test_matches() {
        let record = UserRecord {
            id: None,
            email: "John@Example.com".into(),
            full_name: String::new(),
            password: Some("secret1".into()),
            token: None,
            created_at: None,
        };
        assert!(record.matches("john@example.com", "secret1"));
        assert!(!record.matches("john@example.com", "secret2"));

        let no_password = UserRecord {
            password: None,
            ..record
        };
        assert!(!no_password.matches("john@example.com", "anything"));
        assert!(!no_password.matches("john@example.com", ""));
    }

    /// Returns whatever records it was built with, ignoring the query
    struct FixedRecords(Vec<UserRecord>);

    #[async_trait(?Send)]
    impl CredentialService for FixedRecords {
        async fn find_users(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<Vec<UserRecord>, CredentialError> {
            Ok(self.0.clone())
        }

        async fn create_user(&self, _user: &NewUser) -> Result<UserRecord, CredentialError> {
            Err(CredentialError::Conflict)
        }
    }

    #[tokio::test]
    async fn test_authenticate_rejects_record_without_password() {
        let record = UserRecord {
            id: Some("1".into()),
            email: "john@example.com".into(),
            full_name: "John Doe".into(),
            password: None,
            token: None,
            created_at: None,
        };
        let service = FixedRecords(vec![record.clone()]);
        assert_eq!(
            service
                .authenticate("john@example.com", "definitely-wrong")
                .await
                .unwrap(),
            None
        );

        let service = FixedRecords(vec![
            record,
            UserRecord {
                id: Some("2".into()),
                email: "JOHN@example.com".into(),
                full_name: "John Doe".into(),
                password: Some("secret1".into()),
                token: None,
                created_at: None,
            },
        ]);
        let user = service
            .authenticate("john@example.com", "secret1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id.as_deref(), Some("2"));
    }

    #[test]
    fn test_users_query_is_encoded() {
        assert_eq!(users_url("http://localhost:8082/"), "http://localhost:8082/users");
        assert_eq!(
            users_query("a+b@c.io", "p&ss word"),
            "email=a%2Bb%40c.io&password=p%26ss%20word"
        );
    }
}
