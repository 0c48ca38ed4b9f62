//! Session Types

use serde::{Deserialize, Serialize};

/// Authenticated user as persisted under `currentUser`. Never holds the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(
        default,
        deserialize_with = "crate::credentials::deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub token: String,
}

/// Where the session sends the application after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Login page
    Public,
    /// Dashboard
    Protected,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Public => "/",
            Destination::Protected => "/dashboard",
        }
    }
}

/// Point-in-time copy of the session state handed to listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<SessionUser>,
    pub keep_logged_in: bool,
    pub loading: bool,
    pub is_authenticated: bool,
}

/// Receives navigation requests from the session
pub trait Navigator {
    fn navigate(&self, destination: Destination);
}

impl<F: Fn(Destination)> Navigator for F {
    fn navigate(&self, destination: Destination) {
        self(destination)
    }
}
