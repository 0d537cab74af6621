use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::FrameError;

/// Port the device's embedded HTTP server listens on.
pub const DEVICE_PORT: u16 = 80;

/// Default chunk size for streaming uploads and downloads.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Client configuration for one photo frame.
///
/// - `host`: hostname or IP address of the frame.
/// - `port`: defaults to 80, the only port the device serves.
/// - `connect_timeout_secs`: defaults to 10.
/// - `request_timeout_secs`: `None` means no overall deadline per request.
/// - `chunk_size`: bounded buffer used when streaming payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FrameConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl FrameConfig {
    /// Configuration for `host` with every other field at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
            chunk_size: default_chunk_size(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FrameError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| FrameError::Config(format!("{}: {e}", path.display())))
    }

    /// Reject values the transport cannot work with.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.host.trim().is_empty() {
            return Err(FrameError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(FrameError::Config("port must not be 0".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(FrameError::Config("chunkSize must not be 0".to_string()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

// --- Default value functions ---

fn default_port() -> u16 {
    DEVICE_PORT
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
