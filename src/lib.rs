//! # BI Tool
//!
//! Core of the BI dashboard: the client-side session lifecycle and the
//! filterable, paginated table engine, plus the data behind the dashboard
//! widgets.
//!
//! ## Modules
//!
//! - [`session`]: Login, registration, persistence and idle auto-logout
//! - [`table`]: Draft/committed column filters and pagination
//! - [`credentials`]: Client of the `/users` credential service
//! - [`validation`]: Login and registration form rules
//! - [`chart`]: Axis, bar, line and pie geometry
//! - [`dashboard`]: Indicator cards, chart series and the "New Users" table
//!
//! With the default `native` feature:
//!
//! - `api`: Mock credential service (Axum)
//! - `config`: TOML configuration with environment overrides
//! - `telemetry`: `tracing-subscriber` setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bi_tool::credentials::InMemoryCredentialService;
//! use bi_tool::session::{Destination, ManualScheduler, MemoryStore, SessionConfig, SessionManager};
//!
//! # async fn run() {
//! let session = SessionManager::new(
//!     MemoryStore::new(),
//!     InMemoryCredentialService::new(),
//!     ManualScheduler::new(),
//!     |to: Destination| println!("navigate to {}", to.path()),
//!     SessionConfig::default(),
//! );
//! session.initialize();
//!
//! if session.register("jane@example.com", "secret2", "Jane Smith").await {
//!     println!("logged in as {:?}", session.user());
//! }
//! # }
//! ```

pub mod chart;
pub mod credentials;
pub mod dashboard;
pub mod session;
pub mod table;
pub mod validation;

#[cfg(feature = "native")]
pub mod api;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod telemetry;

// Re-export top-level types for convenience
pub use session::{
    Destination, MemoryStore, Navigator, Scheduler, SessionConfig, SessionManager,
    SessionSnapshot, SessionStore, SessionUser, StoreError,
};

pub use table::{
    Align, CellValue, Column, FilterChip, FilterOption, FilterSelection, TableBody, TableEngine,
    TableRow,
};

pub use credentials::{CredentialError, CredentialService, NewUser, UserRecord};

pub use validation::{Field, LoginForm, RegisterForm, ValidationErrors};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};

#[cfg(feature = "native")]
pub use api::{build_router, serve, ApiError, AppState};
