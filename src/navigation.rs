//! Client entry points and the navigator that moves between them.
//!
//! The dashboard has three places a user can land: the login screen, the
//! admin dashboard, and the user dashboard. Operations never "go" anywhere
//! themselves; they tell a [`Navigator`] where the client should be next and
//! the front end (CLI, tests) decides what that means.

use parking_lot::Mutex;
use std::fmt;

/// A client entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    AdminDashboard,
    UserDashboard,
}

impl Route {
    /// Path of the entry point in the web dashboard.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::AdminDashboard => "/dashboard/admin",
            Self::UserDashboard => "/dashboard/user",
        }
    }

    /// Next-step hint for command-line users.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Login => "run `churnctl login` to sign in",
            Self::AdminDashboard => "admin commands are available under `churnctl admin`",
            Self::UserDashboard => "user commands are available under `churnctl user`",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives navigation requests.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only logs. Used when nothing needs to react to routing.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigate");
    }
}

/// Navigator that records every route it was sent to, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes visited so far.
    pub fn visited(&self) -> Vec<Route> {
        self.visited.lock().clone()
    }

    /// The most recent route, if any.
    pub fn last(&self) -> Option<Route> {
        self.visited.lock().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.visited.lock().push(route);
    }
}
