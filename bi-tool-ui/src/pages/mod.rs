//! Pages
//!
//! Top-level route components.

pub mod dashboard;
pub mod login;
pub mod register;

pub use dashboard::{Dashboard, DashboardLayout};
pub use login::Login;
pub use register::Register;
