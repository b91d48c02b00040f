//! HTTP client for the churn-prediction backend.
//!
//! Every call goes through [`ApiClient::request`], which:
//! - joins the configured base URL with the endpoint path
//! - sets the content type for the body kind (JSON unless form/multipart)
//! - lets caller headers replace those defaults
//! - sets `Authorization: Bearer <token>` when the session holds a token,
//!   replacing any caller value
//! - turns non-success responses into [`ApiError::Http`] with the backend's
//!   own message, and clears the session on 401

use super::error::{extract_error_message, ApiError};
use crate::auth::Session;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for multipart uploads; the backend transcribes call recordings
/// before answering.
pub const UPLOAD_TIMEOUT_SECS: u64 = 600;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body variants.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` key/value pairs.
    UrlEncoded(Vec<(String, String)>),
    /// Multipart form; the HTTP library sets the boundary header.
    Multipart(reqwest::multipart::Form),
}

/// Per-call options merged into the request.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Extra headers. Each replaces a default of the same name; a stored
    /// session token still wins over a caller `Authorization`.
    pub headers: Vec<(String, String)>,
    pub body: Body,
    /// Overrides the client-wide timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn json<T: Serialize + ?Sized>(data: &T) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(data).map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            body: Body::Json(value),
            ..Self::default()
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client bound to one backend and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Session,
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: impl Into<String>, session: Session) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, session, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Session,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("churnctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: normalize_base_url(&base_url.into()),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Perform a request and decode the JSON response into `T`.
    ///
    /// An empty success body decodes as JSON `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        let mut req = self.http.request(method.clone(), &url);
        let mut headers = HeaderMap::new();

        // Form and multipart bodies set their own content type.
        req = match options.body {
            Body::Empty => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                req
            }
            Body::Json(value) => {
                let bytes =
                    serde_json::to_vec(&value).map_err(|e| ApiError::Request(e.to_string()))?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                req.body(bytes)
            }
            Body::UrlEncoded(fields) => req.form(&fields),
            Body::Multipart(form) => req.multipart(form),
        };

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Request(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Request(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        if let Some(token) = self.session.get_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Request(format!("session token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        // `headers()` replaces same-named entries, including a form content type.
        req = req.headers(headers);
        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        tracing::debug!(method = %method, url = %url, "API request");

        let resp = req.send().await.map_err(|e| {
            tracing::debug!(method = %method, url = %url, error = %e, "API request failed");
            ApiError::from_transport(e)
        })?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(ApiError::from_transport)?;

        tracing::debug!(method = %method, url = %url, status = status.as_u16(), "API response");

        if !status.is_success() {
            let message = extract_error_message(status, &body);
            if status == StatusCode::UNAUTHORIZED {
                self.expire_session();
            }
            return Err(ApiError::Http { status, message });
        }

        decode_body(endpoint, &body)
    }

    /// `GET` an endpoint.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, RequestOptions::default())
            .await
    }

    /// `POST` a JSON-serialized body.
    pub async fn post<T, B>(&self, endpoint: &str, data: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, RequestOptions::json(data)?)
            .await
    }

    /// `DELETE` an endpoint.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, RequestOptions::default())
            .await
    }

    /// `POST` a multipart form. No JSON content type is ever set, and the
    /// call runs under [`UPLOAD_TIMEOUT_SECS`] instead of the client timeout.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let options = RequestOptions {
            body: Body::Multipart(form),
            timeout: Some(Duration::from_secs(UPLOAD_TIMEOUT_SECS)),
            ..RequestOptions::default()
        };
        self.request(Method::POST, endpoint, options).await
    }

    /// `POST` form-encoded key/value pairs, in the given order.
    pub async fn post_urlencoded<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let options = RequestOptions {
            body: Body::UrlEncoded(fields),
            ..RequestOptions::default()
        };
        self.request(Method::POST, endpoint, options).await
    }

    fn expire_session(&self) {
        let had_token = self.session.is_authenticated();
        if let Err(e) = self.session.logout() {
            tracing::warn!("Failed to clear session after 401: {e:#}");
            return;
        }
        if had_token {
            tracing::warn!("Backend rejected the session token; signed out");
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Session::ephemeral()).unwrap()
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let c = client("https://api.telcopredict.live");
        assert_eq!(c.url("/api/users/"), "https://api.telcopredict.live/api/users/");
        assert_eq!(c.url("auth/login"), "https://api.telcopredict.live/auth/login");
    }

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let c = client("http://localhost:8000//");
        assert_eq!(c.base_url(), "http://localhost:8000");
        assert_eq!(c.url("/predict/"), "http://localhost:8000/predict/");
    }

    #[test]
    fn empty_body_decodes_as_null() {
        decode_body::<()>("/x", b"").unwrap();
        let value: Value = decode_body("/x", b"  \n").unwrap();
        assert!(value.is_null());
        let opt: Option<i64> = decode_body("/x", b"").unwrap();
        assert!(opt.is_none());
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = decode_body::<Vec<i64>>("/api/users/", br#"{"not":"a list"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(err.to_string().contains("/api/users/"));
    }
}
