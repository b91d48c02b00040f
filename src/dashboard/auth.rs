//! Login, registration and logout.

use super::{require_fields, Dashboard, DashboardError};
use crate::api::{endpoints, RegisterRequest, TokenResponse, User};
use crate::navigation::Route;
use serde_json::Value;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Dashboard the client was sent to.
    pub route: Route,
    /// Profile of the signed-in user, if it could be loaded.
    pub user: Option<User>,
}

/// Registration form contents.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_admin: bool,
}

impl Dashboard {
    /// Sign in with form-encoded credentials and pick the dashboard by role.
    ///
    /// The token is kept even if the profile lookup fails; the user
    /// dashboard is chosen in that case.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DashboardError> {
        require_fields(
            &[("username", username), ("password", password)],
            "Username and password are required",
        )?;

        let token: TokenResponse = self
            .client()
            .post_urlencoded(
                endpoints::LOGIN,
                &[("username", username), ("password", password)],
            )
            .await?;

        self.session()
            .set_token(&token.access_token)
            .map_err(DashboardError::Session)?;
        tracing::info!(username, "Logged in");

        let user = match self.client().get::<User>(endpoints::CURRENT_USER).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Signed in but could not load profile: {e}");
                None
            }
        };

        let route = if user.as_ref().is_some_and(User::is_admin) {
            Route::AdminDashboard
        } else {
            Route::UserDashboard
        };
        self.session().navigate(route);

        Ok(LoginOutcome { route, user })
    }

    /// Create an account. Sends the client to the login screen on success.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Value, DashboardError> {
        require_fields(
            &[
                ("username", form.username.as_str()),
                ("email", form.email.as_str()),
                ("password", form.password.as_str()),
            ],
            "Username, email and password are required",
        )?;
        if form.password != form.confirm_password {
            return Err(DashboardError::validation("Passwords do not match"));
        }

        let body = RegisterRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            is_admin: form.is_admin,
        };
        let created: Value = self.client().post(endpoints::REGISTER, &body).await?;
        tracing::info!(username = %body.username, "Account registered");

        self.session().navigate(Route::Login);
        Ok(created)
    }

    /// Clear the session and return to the login screen.
    pub fn logout(&self) -> Result<(), DashboardError> {
        self.session().logout().map_err(DashboardError::Session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::auth::{MemorySessionStore, Session};
    use crate::navigation::RecordingNavigator;
    use std::sync::Arc;

    // Port 9 (discard) is never served locally, so any request that slips
    // through validation fails as unreachable instead of passing.
    fn offline_dashboard() -> (Dashboard, Arc<RecordingNavigator>) {
        let nav = Arc::new(RecordingNavigator::new());
        let session = Session::new(Arc::new(MemorySessionStore::new()), nav.clone());
        let client = ApiClient::new("http://127.0.0.1:9", session).unwrap();
        (Dashboard::new(client), nav)
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (dash, nav) = offline_dashboard();
        let err = dash.login("alice", "").await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
        assert!(nav.visited().is_empty());
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords() {
        let (dash, _nav) = offline_dashboard();
        let form = RegistrationForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            is_admin: false,
        };
        let err = dash.register(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[tokio::test]
    async fn register_requires_email() {
        let (dash, _nav) = offline_dashboard();
        let form = RegistrationForm {
            username: "alice".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            ..RegistrationForm::default()
        };
        let err = dash.register(&form).await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[test]
    fn logout_navigates_to_login() {
        let (dash, nav) = offline_dashboard();
        dash.session().set_token("tok").unwrap();
        dash.logout().unwrap();
        assert!(!dash.session().is_authenticated());
        assert_eq!(nav.last(), Some(Route::Login));
    }
}
