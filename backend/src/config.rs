//! Server settings, read once at startup from `FORMS_*` environment variables.
//!
//! | Variable                 | Default     |
//! |--------------------------|-------------|
//! | `FORMS_HOST`             | `127.0.0.1` |
//! | `FORMS_PORT`             | `5000`      |
//! | `FORMS_UPLOAD_DIR`       | `uploads`   |
//! | `FORMS_OPEN_BROWSER`     | `true`      |
//! | `FORMS_MAX_UPLOAD_BYTES` | `10485760`  |
//!
//! Invalid values fall back to the default with a warning.

use log::warn;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory uploaded files are written to and served from.
    pub upload_dir: PathBuf,
    /// Open the form in the default browser once the server is up.
    pub open_browser: bool,
    /// Maximum accepted JSON body, in bytes.
    pub json_limit: usize,
    /// Largest file `POST /upload` stores, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            open_browser: true,
            json_limit: 10 * 1024 * 1024, // 10 MB
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("FORMS_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host;
        }
        if let Some(port) = lookup("FORMS_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid FORMS_PORT `{}`", port),
            }
        }
        if let Some(dir) = lookup("FORMS_UPLOAD_DIR").filter(|d| !d.trim().is_empty()) {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("FORMS_MAX_UPLOAD_BYTES") {
            match limit.parse() {
                Ok(limit) => config.max_upload_bytes = limit,
                Err(_) => warn!("Ignoring invalid FORMS_MAX_UPLOAD_BYTES `{}`", limit),
            }
        }
        if let Some(open) = lookup("FORMS_OPEN_BROWSER") {
            match open.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.open_browser = true,
                "0" | "false" | "no" => config.open_browser = false,
                _ => warn!("Ignoring invalid FORMS_OPEN_BROWSER `{}`", open),
            }
        }

        config
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
