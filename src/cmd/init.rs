//! `chain-proxy init`: generate a starter configuration file.
//!
//! Builds a [`Config`] from the given upstream URL and writes it in the
//! chosen format. Refuses to overwrite an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::model::{Config, RunnerConfig, ServerConfig};
use crate::config::validation::validate;
use crate::error::ChainProxyError;

pub fn execute(args: &InitArgs) -> Result<(), ChainProxyError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("config/config.{}", args.format.extension())));

    if output.exists() {
        return Err(ChainProxyError::FileExists { path: output });
    }

    let config = Config {
        server: ServerConfig::default(),
        runner: RunnerConfig {
            server_url: args.server_url.clone(),
        },
    };
    if let Err(errors) = validate(&config) {
        return Err(ChainProxyError::ConfigValidation { errors });
    }

    let content = serialize_config(&config, &args.format)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}

/// Serialize a `Config` to a formatted string in the given format.
pub fn serialize_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, ChainProxyError> {
    match format {
        #[cfg(feature = "yaml")]
        ConfigFormat::Yaml => serde_yml::to_string(config)
            .map_err(|e| ChainProxyError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "yaml"))]
        ConfigFormat::Yaml => Err(ChainProxyError::UnsupportedFormat("yaml".into())),

        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| ChainProxyError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(feature = "toml")]
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| ChainProxyError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "toml"))]
        ConfigFormat::Toml => Err(ChainProxyError::UnsupportedFormat("toml".into())),
    }
}
