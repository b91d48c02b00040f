//! Backend API access: client, errors, and wire types.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, Body, RequestOptions, DEFAULT_TIMEOUT_SECS, UPLOAD_TIMEOUT_SECS};
pub use error::{extract_error_message, ApiError, UNREACHABLE_MESSAGE};
pub use models::{
    CreateAdminRequest, Feedback, FeedbackCreate, Log, MlModel, ModelCreate, Prediction,
    PredictionInput, RegisterRequest, TokenResponse, User,
};

/// Default backend origin.
pub const DEFAULT_API_URL: &str = "https://api.telcopredict.live";

/// Backend endpoint paths.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const CURRENT_USER: &str = "/api/users/me";
    pub const USERS: &str = "/api/users/";
    pub const FEEDBACK: &str = "/api/feedback/";
    pub const LOGS: &str = "/api/logs/";
    pub const MODELS: &str = "/api/models/";
    pub const PREDICT: &str = "/predict/";
    pub const PREDICTIONS: &str = "/predict/predictions/";
    pub const PREDICT_FROM_CALL: &str = "/predict/from-call";
    pub const CREATE_ADMIN: &str = "/admin/create-admin";

    /// Path of a single stored prediction.
    pub fn prediction(id: i64) -> String {
        format!("{PREDICTIONS}{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::endpoints;

    #[test]
    fn prediction_path_appends_id() {
        assert_eq!(endpoints::prediction(42), "/predict/predictions/42");
    }
}
