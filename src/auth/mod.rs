//! Client-side session handling.
//!
//! Provides:
//! - Bearer-token persistence behind the [`SessionStore`] trait
//! - A [`Session`] context that pairs a store with a [`Navigator`], so
//!   logging out (explicitly or after a 401) also moves the client back to
//!   the login entry point
//!
//! ## Design Decisions
//! - No expiry or refresh: a token is trusted until the backend rejects it.
//! - The session is passed around explicitly instead of living in a global,
//!   so tests can supply an in-memory store and a recording navigator.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_FILE_NAME};

use crate::navigation::{LogNavigator, Navigator, Route};
use anyhow::Result;
use std::sync::Arc;

/// Shared session context: where the token lives and who handles routing.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// In-memory session with a logging navigator.
    pub fn ephemeral() -> Self {
        Self::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(LogNavigator),
        )
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set_token(token)
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get_token()
    }

    pub fn remove_token(&self) -> Result<()> {
        self.store.remove_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Clear the token and return to the login entry point.
    pub fn logout(&self) -> Result<()> {
        self.store.remove_token()?;
        tracing::info!("Logged out");
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
