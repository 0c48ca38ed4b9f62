//! HTTP API Client
//!
//! [`CredentialService`] over `gloo-net`, used by the browser session.

use async_trait::async_trait;
use bi_tool::credentials::{
    users_query, users_url, CredentialError, CredentialService, NewUser, UserRecord,
};
use gloo_net::http::{Request, Response};
use serde::Deserialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082";

/// Local storage key overriding [`DEFAULT_API_BASE`]
pub const API_URL_KEY: &str = "bi_tool_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Credential service reached with `fetch`
#[derive(Debug, Clone)]
pub struct RemoteCredentials {
    base_url: String,
}

impl RemoteCredentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn error_for(response: Response) -> CredentialError {
        if response.status() == 409 {
            return CredentialError::Conflict;
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        CredentialError::Status {
            status,
            message: error_message(&body),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// `error.message` from a JSON error body, else the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn transport(e: gloo_net::Error) -> CredentialError {
    CredentialError::Transport(e.to_string())
}

fn decode(e: gloo_net::Error) -> CredentialError {
    CredentialError::Decode(e.to_string())
}

#[async_trait(?Send)]
impl CredentialService for RemoteCredentials {
    async fn find_users(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, CredentialError> {
        let url = format!(
            "{}?{}",
            users_url(&self.base_url),
            users_query(email, password)
        );

        let response = Request::get(&url).send().await.map_err(transport)?;
        if !response.ok() {
            return Err(Self::error_for(response).await);
        }
        response.json::<Vec<UserRecord>>().await.map_err(decode)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, CredentialError> {
        let response = Request::post(&users_url(&self.base_url))
            .json(user)
            .map_err(decode)?
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(Self::error_for(response).await);
        }
        response.json::<UserRecord>().await.map_err(decode)
    }
}
