//! Device identity resolution.
//!
//! The device identifier is resolved once at startup: an explicit value
//! wins, otherwise it is read from the identifier file, and a fresh UUID
//! v4 is generated and persisted when that file does not exist yet. The
//! resulting [`DeviceId`] is immutable for the lifetime of the process.

use std::path::Path;

use axum::http::HeaderValue;

use crate::error::ChainProxyError;

/// A verified device identifier, ready to be sent as a header value.
#[derive(Debug, Clone)]
pub struct DeviceId {
    value: String,
    header: HeaderValue,
}

impl DeviceId {
    /// Verify `raw` and build a [`DeviceId`]. Surrounding whitespace is trimmed.
    pub fn parse(raw: &str, origin: &str) -> Result<Self, ChainProxyError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ChainProxyError::InvalidDeviceId {
                origin: origin.to_string(),
                reason: "identifier is empty".into(),
            });
        }
        let header = HeaderValue::from_str(value).map_err(|_| ChainProxyError::InvalidDeviceId {
            origin: origin.to_string(),
            reason: "identifier contains characters not allowed in a header value".into(),
        })?;
        Ok(Self {
            value: value.to_string(),
            header,
        })
    }

    pub fn generate() -> Result<Self, ChainProxyError> {
        Self::parse(&uuid::Uuid::new_v4().to_string(), "generated")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Resolve the device identifier for this process.
pub async fn resolve(explicit: Option<&str>, file: &Path) -> Result<DeviceId, ChainProxyError> {
    if let Some(raw) = explicit {
        return DeviceId::parse(raw, "--device-id");
    }

    match tokio::fs::read_to_string(file).await {
        Ok(content) => DeviceId::parse(&content, &file.display().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let id = DeviceId::generate()?;
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(file, format!("{id}\n")).await?;
            tracing::info!(path = %file.display(), device_id = %id, "generated new device id");
            Ok(id)
        }
        Err(e) => Err(ChainProxyError::Io(e)),
    }
}
