//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod charts;
pub mod data_table;
pub mod indicator_card;
pub mod loading;
pub mod nav;
pub mod protected_route;
pub mod toast;

pub use charts::{BarChart, LineChart, PieChart};
pub use data_table::DataTable;
pub use indicator_card::IndicatorCard;
pub use loading::Loading;
pub use nav::{AppBar, SideDrawer};
pub use protected_route::ProtectedRoute;
pub use toast::Toast;
