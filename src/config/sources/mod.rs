//! Config file sources.
//!
//! [`parse_config_str`] deserializes a config string according to its
//! file extension (YAML, JSON, TOML, each gated by a feature flag), and
//! [`file_source::FileSource`] reads, parses and validates a file.

pub mod file_source;

use crate::config::model::Config;
use crate::error::ChainProxyError;

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, ChainProxyError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| ChainProxyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| ChainProxyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| ChainProxyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(ChainProxyError::UnsupportedFormat(other.to_string())),
    }
}
