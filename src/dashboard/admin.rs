//! Admin panel: profile guard, listings, admin creation.

use super::{require_fields, Dashboard, DashboardError};
use crate::api::{endpoints, CreateAdminRequest, Feedback, Log, MlModel, User};
use crate::navigation::Route;
use serde_json::Value;

/// Minimum password length accepted for new admin accounts.
pub const MIN_ADMIN_PASSWORD_LEN: usize = 6;

/// "Create admin" form contents.
#[derive(Debug, Clone, Default)]
pub struct AdminForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AdminForm {
    fn validate(&self) -> Result<(), DashboardError> {
        require_fields(
            &[
                ("username", self.username.as_str()),
                ("email", self.email.as_str()),
                ("password", self.password.as_str()),
                ("confirm_password", self.confirm_password.as_str()),
            ],
            "All fields are required",
        )?;
        if self.password != self.confirm_password {
            return Err(DashboardError::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
            return Err(DashboardError::validation(format!(
                "Password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl Dashboard {
    /// Profile of the signed-in admin.
    ///
    /// Without a token the client is sent to the login screen; a non-admin
    /// account is sent to the user dashboard.
    pub async fn admin_profile(&self) -> Result<User, DashboardError> {
        self.require_login("No authentication token found. Please log in.")?;

        let user: User = self.client().get(endpoints::CURRENT_USER).await?;
        if !user.is_admin() {
            tracing::info!(username = %user.username, "Not an admin, redirecting");
            self.session().navigate(Route::UserDashboard);
            return Err(DashboardError::NotAdmin);
        }
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DashboardError> {
        Ok(self.client().get(endpoints::USERS).await?)
    }

    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, DashboardError> {
        Ok(self.client().get(endpoints::FEEDBACK).await?)
    }

    pub async fn list_models(&self) -> Result<Vec<MlModel>, DashboardError> {
        Ok(self.client().get(endpoints::MODELS).await?)
    }

    pub async fn list_logs(&self) -> Result<Vec<Log>, DashboardError> {
        Ok(self.client().get(endpoints::LOGS).await?)
    }

    /// Create another admin account.
    pub async fn create_admin(&self, form: &AdminForm) -> Result<Value, DashboardError> {
        form.validate()?;

        let body = CreateAdminRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            confirm_password: form.confirm_password.clone(),
        };
        let created: Value = self.client().post(endpoints::CREATE_ADMIN, &body).await?;
        tracing::info!(username = %body.username, "Admin account created");
        Ok(created)
    }
}
