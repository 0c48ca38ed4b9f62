//! State Management
//!
//! Browser adapters for the core session plus global notification state.

pub mod auth;
pub mod global;
pub mod storage;
pub mod timer;

pub use auth::{use_auth, AuthContext, AuthProvider};
pub use global::{provide_global_state, GlobalState, Notice};
