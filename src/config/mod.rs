//! Configuration loading and validation.
//!
//! Configuration is read once at startup and never reloaded. Submodules
//! provide the data model, validation logic and the file source.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::Path;

use crate::error::ChainProxyError;
use model::Config;
use sources::file_source::FileSource;

/// Load and validate the config file at `path`.
pub async fn load(path: &Path) -> Result<Config, ChainProxyError> {
    FileSource::new(path).load().await
}
