//! Credential Service Access
//!
//! Browser HTTP client for the `/users` API.

pub mod client;

pub use client::{get_api_base, RemoteCredentials};
