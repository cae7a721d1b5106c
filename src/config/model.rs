//! Serde data structures for the chain-proxy configuration file.
//!
//! Contains [`Config`] (the root), [`ServerConfig`] for the local
//! listener and [`RunnerConfig`] for the upstream server. Unknown keys
//! are ignored at every level: the file is shared with other components
//! that keep their own settings in the same sections.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn is_default_host(v: &str) -> bool {
    v == default_host()
}

fn is_default_server(v: &ServerConfig) -> bool {
    is_default_host(&v.host)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_server")]
    pub server: ServerConfig,

    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host", skip_serializing_if = "is_default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Base URL of the upstream server; request paths are appended verbatim.
    pub server_url: String,
}
