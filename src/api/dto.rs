//! Data Transfer Objects
//!
//! Request and response bodies for the mock credential API. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Stored account, also the response body of every `/users` route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `POST /users` body. Missing fields become empty strings so the
/// handler can report them as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

impl CreateUserRequest {
    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("email", &self.email),
            ("password", &self.password),
            ("fullName", &self.full_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// `GET /users` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

impl UserQuery {
    pub fn matches(&self, user: &StoredUser) -> bool {
        self.email
            .as_deref()
            .map_or(true, |e| user.email.eq_ignore_ascii_case(e))
            && self.password.as_deref().map_or(true, |p| user.password == p)
            && self
                .full_name
                .as_deref()
                .map_or(true, |n| user.full_name == n)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub users: usize,
    pub storage: String,
}

/// Readiness probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
