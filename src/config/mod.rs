use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback shared secret, mirroring the original deployment's dev default.
/// A warning is logged at startup when this value is in use.
pub const DEFAULT_API_TOKEN: &str = "dev-token-change-in-production";

/// Service configuration, loaded once at startup and shared immutably.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory under which all uploaded files are persisted (default: ./uploads)
    pub storage_root: PathBuf,

    /// Shared bearer secret compared against incoming credentials
    pub api_token: String,

    /// Network bind address (default: 127.0.0.1)
    pub bind_addr: String,

    /// Listen port (default: 3000)
    pub port: u16,

    /// Maximum upload size in bytes (default: 50 MiB)
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./uploads"),
            api_token: DEFAULT_API_TOKEN.to_string(),
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: 50 * 1024 * 1024, // 50 MiB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.storage_root),

            api_token: env::var("API_TOKEN").unwrap_or(default.api_token),

            bind_addr: env::var("BIND_ADDR").unwrap_or(default.bind_addr),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_bytes),
        }
    }

    /// True when the insecure development token is still in effect
    pub fn uses_default_token(&self) -> bool {
        self.api_token == DEFAULT_API_TOKEN
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }
}
