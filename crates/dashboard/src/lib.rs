//! Crop yield dashboard
//!
//! Serves the prediction page, the downloadable report and a small JSON API
//! on top of a [`cropyield_model::DashboardContext`].

pub mod config;
pub mod page;
pub mod server;

pub use config::DashboardConfig;
pub use server::{build_router, start_server, AppState};
