//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for an empty
//! listener host and a malformed or non-HTTP upstream URL. Returns a list
//! of [`ValidationError`] values with per-field suggestions.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate the upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_server_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("server_url cannot be empty".into());
    }
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err("server_url must not carry a query or fragment".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "server.host".into(),
            message: "host cannot be empty".into(),
            suggestion: Some("use '0.0.0.0' to listen on all interfaces".into()),
        });
    }

    let server_url = &config.runner.server_url;
    if let Err(msg) = validate_server_url(server_url) {
        errors.push(ValidationError {
            field: "runner.server_url".into(),
            message: msg,
            suggestion: if server_url.is_empty() || server_url.contains("://") {
                None
            } else {
                Some(format!("did you mean 'http://{server_url}'?"))
            },
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    format!(
        "{path} is valid\n  listen: {}\n  upstream: {}",
        config.server.host, config.runner.server_url
    )
}
