//! User panel: profile, feedback, model registration, predictions.

use super::{Dashboard, DashboardError};
use crate::api::{
    endpoints, ApiError, Feedback, FeedbackCreate, MlModel, ModelCreate, Prediction,
    PredictionInput, User,
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;

/// Multipart field carrying the call recording.
pub const CALL_FILE_FIELD: &str = "file";

impl Dashboard {
    pub async fn user_profile(&self) -> Result<User, DashboardError> {
        self.require_token("No authentication token found. Please log in.")?;
        Ok(self.client().get(endpoints::CURRENT_USER).await?)
    }

    pub async fn submit_feedback(&self, feedback: &FeedbackCreate) -> Result<Feedback, DashboardError> {
        self.require_token("You must be logged in to submit feedback")?;
        let created: Feedback = self.client().post(endpoints::FEEDBACK, feedback).await?;
        tracing::info!(id = created.id, prediction_id = created.prediction_id, "Feedback submitted");
        Ok(created)
    }

    pub async fn create_model(&self, model: &ModelCreate) -> Result<MlModel, DashboardError> {
        self.require_token("You must be logged in to create a model")?;
        if model.name.trim().is_empty() {
            return Err(DashboardError::validation("Model name is required"));
        }
        let created: MlModel = self.client().post(endpoints::MODELS, model).await?;
        tracing::info!(id = created.id, name = %created.name, "Model registered");
        Ok(created)
    }

    /// Manual prediction from customer features.
    pub async fn predict(&self, input: &PredictionInput) -> Result<Prediction, DashboardError> {
        if input.is_empty() {
            return Err(DashboardError::validation(
                "At least one customer feature is required",
            ));
        }
        Ok(self.client().post(endpoints::PREDICT, input).await?)
    }

    pub async fn list_predictions(&self) -> Result<Vec<Prediction>, DashboardError> {
        Ok(self.client().get(endpoints::PREDICTIONS).await?)
    }

    /// Delete a stored prediction. Returns whatever the backend echoes
    /// (`Null` for an empty body).
    pub async fn delete_prediction(&self, id: i64) -> Result<Value, DashboardError> {
        let echoed: Value = self.client().delete(&endpoints::prediction(id)).await?;
        tracing::info!(id, "Prediction deleted");
        Ok(echoed)
    }

    /// Upload a call recording and predict from the conversation.
    pub async fn predict_from_call(&self, recording: &Path) -> Result<Prediction, DashboardError> {
        let bytes = tokio::fs::read(recording).await.map_err(|e| {
            DashboardError::validation(format!(
                "Cannot read call recording {}: {e}",
                recording.display()
            ))
        })?;
        if bytes.is_empty() {
            return Err(DashboardError::validation(format!(
                "Call recording {} is empty",
                recording.display()
            )));
        }

        let file_name = recording
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());
        let mime = mime_guess::from_path(recording).first_or_octet_stream();
        tracing::debug!(file = %file_name, mime = %mime, size = bytes.len(), "Uploading call recording");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = Form::new().part(CALL_FILE_FIELD, part);

        Ok(self
            .client()
            .post_form(endpoints::PREDICT_FROM_CALL, form)
            .await?)
    }
}

/// Parse `key=value` pairs into a feature object.
///
/// Values that read as JSON scalars (`12`, `0.5`, `true`, `null`) keep their
/// type; anything else is a string. Later keys overwrite earlier ones.
pub fn parse_features<S: AsRef<str>>(pairs: &[S]) -> Result<PredictionInput, DashboardError> {
    let mut features = PredictionInput::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(DashboardError::validation(format!(
                "Feature '{pair}' must be written as key=value"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(DashboardError::validation(format!(
                "Feature '{pair}' has an empty name"
            )));
        }
        features.insert(key.to_string(), scalar_value(raw.trim()));
    }
    Ok(features)
}

fn scalar_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}
