use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub mongodb_uri: String,
    /// Database holding the per-field reading collections.
    pub database_name: String,
    pub server_host: String,
    pub server_port: u16,
    /// Directory where decoded sensor images are written.
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mongodb_uri: required("MONGODB_URI")?,
            database_name: optional("MONGODB_DATABASE", "AgriVision_IoT"),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "3000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            upload_dir: optional("UPLOAD_DIR", "uploads"),
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
