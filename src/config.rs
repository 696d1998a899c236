//! Configuration constants and types for the stegano client.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default service location (the bundled Flask app listens here).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default embed endpoint path.
pub const DEFAULT_EMBED_PATH: &str = "/api/embed";

/// Default extract endpoint path.
pub const DEFAULT_EXTRACT_PATH: &str = "/api/extract";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "STEGANO_URL";

/// Bytes reserved by the embedding format's structural header.
pub const CAPACITY_HEADER_BYTES: u64 = 8;

/// Color channels carrying one LSB each.
pub const CAPACITY_CHANNELS: u64 = 3;

/// Description of the capacity estimation method.
pub const CAPACITY_BASIS: &str = "image LSB";

/// Filename used when the extract response does not name the payload.
pub const FALLBACK_SECRET_FILENAME: &str = "secret.bin";

/// Extensions that get an inline text preview after extraction.
pub const TEXT_PREVIEW_EXTENSIONS: [&str; 4] = ["txt", "json", "md", "log"];

/// Failure reasons used when the service gives none.
pub mod reasons {
    /// Embed failed without a usable error message.
    pub const EMBED_FAILED: &str = "Embedding failed";

    /// Extract failed without a usable error message.
    pub const EXTRACT_FAILED: &str = "Extraction failed";

    /// Prefix for transport failures.
    pub const NETWORK_ERROR: &str = "Network error";
}

/// Sharing templates for a created stego file.
pub mod share {
    /// Message body; the download URL is appended.
    pub const MESSAGE_PREFIX: &str = "Here is your stego-file generated by Stegano: ";

    /// Subject line for the email variant.
    pub const EMAIL_SUBJECT: &str = "Stegano stego-file";

    /// WhatsApp share endpoint.
    pub const WHATSAPP_URL: &str = "https://wa.me/";

    /// Telegram share endpoint.
    pub const TELEGRAM_URL: &str = "https://t.me/share/url";
}

/// Configuration for talking to the steganography service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the service.
    pub base_url: String,

    /// Path of the embed endpoint.
    pub embed_path: String,

    /// Path of the extract endpoint.
    pub extract_path: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            embed_path: DEFAULT_EMBED_PATH.to_string(),
            extract_path: DEFAULT_EXTRACT_PATH.to_string(),
            user_agent: concat!("stegano-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url` with default paths.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    /// Apply `STEGANO_URL` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err("Base URL must not be empty".to_string());
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(format!("Base URL must use http or https: {}", base));
        }
        for path in [&self.embed_path, &self.extract_path] {
            if !path.starts_with('/') {
                return Err(format!("Endpoint path must start with '/': {}", path));
            }
        }
        Ok(())
    }

    /// Full URL of the embed endpoint.
    pub fn embed_url(&self) -> String {
        self.join(&self.embed_path)
    }

    /// Full URL of the extract endpoint.
    pub fn extract_url(&self) -> String {
        self.join(&self.extract_path)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}
