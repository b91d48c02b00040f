//! Client library for the TelcoPredict churn-prediction service.
//!
//! - [`auth`]: bearer-token session store and the injectable [`auth::Session`]
//! - [`api`]: HTTP client, error normalization, wire types
//! - [`dashboard`]: login/registration, admin and user panel operations
//! - [`config`]: `config.toml` + environment configuration
//! - [`navigation`]: client entry points and the navigator seam

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod navigation;

pub use api::{ApiClient, ApiError};
pub use auth::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardError};
pub use navigation::{Navigator, Route};
