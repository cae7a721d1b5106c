//! Async file-based config source.
//!
//! [`FileSource`] reads the file via Tokio, picks the parser from the
//! file extension and validates the result before handing it out.

use std::path::{Path, PathBuf};

use super::parse_config_str;
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::error::ChainProxyError;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, ChainProxyError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChainProxyError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                ChainProxyError::Io(e)
            }
        })
    }

    pub async fn load(&self) -> Result<Config, ChainProxyError> {
        let content = self.read_content().await?;
        let ext = self.path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = parse_config_str(ext, &content, &self.path.display().to_string())?;

        if let Err(errors) = validate(&config) {
            return Err(ChainProxyError::ConfigValidation { errors });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.yaml"));
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ChainProxyError::ConfigFileNotFound { .. }));
    }

    #[cfg(feature = "yaml")]
    #[tokio::test]
    async fn loads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "runner:\n  server_url: http://localhost:8080\n").unwrap();

        let config = FileSource::new(&path).load().await.unwrap();
        assert_eq!(config.runner.server_url, "http://localhost:8080");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[cfg(feature = "yaml")]
    #[tokio::test]
    async fn invalid_config_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "runner:\n  server_url: ftp://localhost\n").unwrap();

        let err = FileSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ChainProxyError::ConfigValidation { .. }));
    }
}
