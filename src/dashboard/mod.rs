//! Dashboard operations.
//!
//! One method per form or listing of the web dashboard. Each does its own
//! presence/confirmation checks before touching the network and otherwise
//! defers to [`ApiClient`]; there is no shared state beyond the session.

pub mod admin;
pub mod auth;
pub mod user;

pub use admin::AdminForm;
pub use auth::{LoginOutcome, RegistrationForm};
pub use user::parse_features;

use crate::api::{ApiClient, ApiError};
use crate::auth::Session;
use crate::navigation::Route;

/// Failure of a dashboard operation.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Rejected locally; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Signed in, but the account lacks the admin role.
    #[error("Admin access required")]
    NotAdmin,

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted or removed.
    #[error("Session storage error: {0:#}")]
    Session(anyhow::Error),
}

impl DashboardError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Dashboard bound to an API client.
#[derive(Debug, Clone)]
pub struct Dashboard {
    client: ApiClient,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Fail with `msg` unless a token is stored.
    fn require_token(&self, msg: &str) -> Result<(), DashboardError> {
        if self.session().is_authenticated() {
            Ok(())
        } else {
            Err(DashboardError::validation(msg))
        }
    }

    /// Like [`Self::require_token`], but also sends the client to the login screen.
    fn require_login(&self, msg: &str) -> Result<(), DashboardError> {
        self.require_token(msg).inspect_err(|_| {
            self.session().navigate(Route::Login);
        })
    }
}

/// Error unless every `(label, value)` pair is non-blank.
fn require_fields(fields: &[(&str, &str)], msg: &str) -> Result<(), DashboardError> {
    if fields.iter().any(|(_, value)| value.trim().is_empty()) {
        return Err(DashboardError::validation(msg));
    }
    Ok(())
}
