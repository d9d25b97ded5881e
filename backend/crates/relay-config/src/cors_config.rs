use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Browser origins allowed to open the WebSocket and call the HTTP API.
/// An empty list allows any origin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for origin in &self.allowed_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::cors(format!(
                    "cors.allowed_origins entries must start with http:// or https://, got '{origin}'"
                )));
            }
            if origin.ends_with('/') {
                return Err(ConfigError::cors(format!(
                    "cors.allowed_origins entries must not end with '/', got '{origin}'"
                )));
            }
        }

        Ok(())
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty()
    }

    /// Whether a request `Origin` header value passes the allow-list.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        if self.allows_any() {
            return true;
        }
        match origin {
            Some(origin) if !origin.is_empty() => {
                self.allowed_origins.iter().any(|allowed| allowed == origin)
            }
            _ => false,
        }
    }
}
