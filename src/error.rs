//! Unified error types for chain-proxy.
//!
//! Defines [`ChainProxyError`] (startup and CLI failures, all fatal),
//! [`ForwardError`] (per-request failures, each mapped to an HTTP
//! status) and [`ValidationError`] for config validation reports.

use std::path::PathBuf;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ChainProxyError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid device identifier from {origin}: {reason}")]
    InvalidDeviceId { origin: String, reason: String },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A failure while forwarding one request. Never fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("request body is not a JSON object: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to build upstream request: {0}")]
    RequestConstruction(#[source] http::Error),

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] hyper_util::client::legacy::Error),
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::BodyRead(_) | Self::Serialization(_) | Self::RequestConstruction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Generic client-facing message; the underlying cause is only logged.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::BodyRead(_) => "Error reading request body",
            Self::InvalidBody(_) => "Invalid request body",
            Self::Serialization(_) => "Error processing request",
            Self::RequestConstruction(_) => "Error creating proxy request",
            Self::UpstreamUnreachable(_) => "Error forwarding request",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self.public_message()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn invalid_body_maps_to_400() {
        let err = ForwardError::InvalidBody(invalid_json());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_faults_map_to_500() {
        let err = ForwardError::Serialization(invalid_json());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let construction = http::Request::builder()
            .uri("http://[bad")
            .body(())
            .unwrap_err();
        let err = ForwardError::RequestConstruction(construction);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_carries_generic_message() {
        let resp = ForwardError::InvalidBody(invalid_json()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn validation_error_display_includes_suggestion() {
        let err = ValidationError {
            field: "runner.server_url".into(),
            message: "is required".into(),
            suggestion: Some("e.g. http://localhost:8080".into()),
        };
        assert_eq!(
            err.to_string(),
            "  runner.server_url: is required (e.g. http://localhost:8080)"
        );
    }
}
