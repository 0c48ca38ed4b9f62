//! Application State
//!
//! Shared state accessible by all API handlers: the user directory and the
//! server config. Wrapped in Arc for sharing across async tasks.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::dto::{CreateUserRequest, StoredUser, UserQuery};
use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserDirectory>,
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(users: UserDirectory, config: ApiConfig) -> Self {
        Self {
            users: Arc::new(users),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Open the directory configured by `config.db_path`, or an in-memory one
    pub async fn from_config(config: ApiConfig) -> ApiResult<Self> {
        let users = match &config.db_path {
            Some(path) => UserDirectory::open(path).await?,
            None => UserDirectory::in_memory(),
        };
        Ok(Self::new(users, config))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// On-disk layout of the user database
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    users: Vec<StoredUser>,
}

struct Directory {
    users: Vec<StoredUser>,
    next_id: u64,
}

/// Registered accounts, optionally mirrored to a JSON file
pub struct UserDirectory {
    inner: RwLock<Directory>,
    db_path: Option<PathBuf>,
}

impl UserDirectory {
    pub fn in_memory() -> Self {
        Self::with_users(Vec::new(), None)
    }

    /// Load the database at `path`. A missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let db: Database = serde_json::from_str(&content).map_err(|e| {
                    ApiError::Internal(format!("Corrupt user database {:?}: {}", path, e))
                })?;
                db.users
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = ?path, users = users.len(), "Opened user database");
        Ok(Self::with_users(users, Some(path)))
    }

    fn with_users(users: Vec<StoredUser>, db_path: Option<PathBuf>) -> Self {
        let next_id = users
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: RwLock::new(Directory { users, next_id }),
            db_path,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.db_path.is_some()
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn find(&self, query: &UserQuery) -> Vec<StoredUser> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .filter(|u| query.matches(u))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<StoredUser> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Register a new account. Emails are unique ignoring ASCII case.
    pub async fn create(&self, req: CreateUserRequest) -> ApiResult<StoredUser> {
        let mut dir = self.inner.write().await;
        if dir
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&req.email))
        {
            return Err(ApiError::Conflict(format!(
                "Email '{}' is already registered",
                req.email
            )));
        }

        let user = StoredUser {
            id: dir.next_id.to_string(),
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            token: None,
        };
        dir.next_id += 1;
        dir.users.push(user.clone());

        if let Err(e) = self.persist(&dir.users).await {
            dir.users.pop();
            dir.next_id -= 1;
            return Err(e);
        }

        tracing::info!(id = %user.id, "Registered user");
        Ok(user)
    }

    pub async fn remove(&self, id: &str) -> ApiResult<Option<StoredUser>> {
        let mut dir = self.inner.write().await;
        let Some(pos) = dir.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        let removed = dir.users.remove(pos);
        if let Err(e) = self.persist(&dir.users).await {
            dir.users.insert(pos, removed);
            return Err(e);
        }

        tracing::info!(id = %removed.id, "Deleted user");
        Ok(Some(removed))
    }

    /// Rewrite the database file. Called with the write lock held.
    async fn persist(&self, users: &[StoredUser]) -> ApiResult<()> {
        let Some(path) = &self.db_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&serde_json::json!({ "users": users }))
            .map_err(|e| ApiError::Internal(format!("Failed to encode users: {}", e)))?;
        tokio::fs::write(path, json).await.map_err(|e| {
            tracing::warn!(path = ?path, error = %e, "Failed to write user database");
            ApiError::Io(e)
        })
    }
}
