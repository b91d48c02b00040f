//! Request and response shapes for the prediction backend.
//!
//! Records are transient copies of backend entities. Optional fields use
//! `#[serde(default)]` so older and newer backend revisions both decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Auth ─────────────────────────────────────────────────────────

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// JSON body for `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// JSON body for `/admin/create-admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// ── Users ────────────────────────────────────────────────────────

/// Role reference nested inside a role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: String,
}

/// One entry of a user's `roles` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    #[serde(default)]
    pub role: Option<RoleRef>,
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Flat role name (`"admin"`, `"user"`), when the backend sends one.
    #[serde(default)]
    pub role: Option<String>,
    /// Role assignments, when the backend sends the relational form.
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the user holds the admin role in either representation.
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
            || self
                .roles
                .iter()
                .any(|r| r.role.as_ref().is_some_and(|role| role.name == "admin"))
    }

    /// Role label for display.
    pub fn role_label(&self) -> String {
        if let Some(role) = self.role.as_deref().filter(|r| !r.is_empty()) {
            return role.to_string();
        }
        let names: Vec<&str> = self
            .roles
            .iter()
            .filter_map(|r| r.role.as_ref().map(|role| role.name.as_str()))
            .collect();
        if names.is_empty() {
            "user".to_string()
        } else {
            names.join(",")
        }
    }
}

// ── Feedback ─────────────────────────────────────────────────────

/// Feedback on a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub prediction_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub correct: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// JSON body for `POST /api/feedback/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackCreate {
    pub prediction_id: i64,
    pub correct: bool,
    pub comment: String,
}

// ── Models ───────────────────────────────────────────────────────

/// A registered prediction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlModel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// JSON body for `POST /api/models/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCreate {
    pub name: String,
    pub description: String,
}

// ── Logs ─────────────────────────────────────────────────────────

/// One prediction log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub model_id: Option<i64>,
    #[serde(default)]
    pub input_data: String,
    #[serde(default)]
    pub output: String,
    /// Kept as the raw string: the backend emits naive timestamps.
    #[serde(default)]
    pub timestamp: String,
}

// ── Predictions ──────────────────────────────────────────────────

/// Customer features for a manual prediction.
pub type PredictionInput = Map<String, Value>;

/// A churn prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "churn_probability")]
    pub probability: Option<f64>,
    #[serde(default)]
    pub prediction: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Everything else the backend returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Prediction {
    /// Probability as a percentage string, e.g. `"73.4%"`.
    pub fn probability_percent(&self) -> Option<String> {
        self.probability.map(|p| format!("{:.1}%", p * 100.0))
    }
}
