//! API error type and error-body message extraction.

use reqwest::StatusCode;
use serde_json::Value;

/// Message shown when the backend cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach the prediction service. Please try again.";

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("Unable to reach the prediction service. Please try again.")]
    Unreachable(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// A success response whose body was not the expected shape.
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be built (bad URL, unreadable body).
    #[error("Invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            Self::Unreachable(err)
        }
    }
}

/// Human-readable message for a failed response.
///
/// Precedence: `detail[0].msg`, then a string `detail`, then
/// `API Error: <status>`. Empty strings count as absent and a body that is
/// not JSON falls through to the generic message.
pub fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| message_from_value(&value))
        .unwrap_or_else(|| generic_message(status))
}

fn message_from_value(value: &Value) -> Option<String> {
    let detail = value.get("detail");

    let from_list = detail
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|first| first.get("msg"))
        .and_then(Value::as_str);
    let from_detail = detail.and_then(Value::as_str);

    [from_list, from_detail]
        .into_iter()
        .flatten()
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

fn generic_message(status: StatusCode) -> String {
    format!("API Error: {}", status.as_u16())
}
