//! Credential Service REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{users_query, users_url, CredentialError, CredentialService, NewUser, UserRecord};

/// Configuration for the HTTP credential client
#[derive(Debug, Clone)]
pub struct HttpCredentialConfig {
    /// Base URL of the mock API (e.g., "http://localhost:8082")
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpCredentialConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// reqwest-backed [`CredentialService`]
#[derive(Debug, Clone)]
pub struct HttpCredentialService {
    client: Client,
    config: HttpCredentialConfig,
}

impl HttpCredentialService {
    pub fn new(config: HttpCredentialConfig) -> Result<Self, CredentialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .map_err(transport)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpCredentialConfig {
        &self.config
    }

    async fn error_for(response: reqwest::Response) -> CredentialError {
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return CredentialError::Conflict;
        }
        let message = response.text().await.unwrap_or_default();
        CredentialError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

fn transport(e: reqwest::Error) -> CredentialError {
    if e.is_timeout() {
        CredentialError::Transport("request timed out".to_string())
    } else {
        CredentialError::Transport(e.to_string())
    }
}

fn decode(e: reqwest::Error) -> CredentialError {
    CredentialError::Decode(e.to_string())
}

#[async_trait(?Send)]
impl CredentialService for HttpCredentialService {
    async fn find_users(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, CredentialError> {
        let url = format!(
            "{}?{}",
            users_url(&self.config.base_url),
            users_query(email, password)
        );
        debug!(email, "Looking up account");

        let response = self.client.get(&url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        response.json::<Vec<UserRecord>>().await.map_err(decode)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, CredentialError> {
        let url = users_url(&self.config.base_url);
        debug!(email = %user.email, "Creating account");

        let response = self
            .client
            .post(&url)
            .json(user)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        response.json::<UserRecord>().await.map_err(decode)
    }
}
