//! Environment-driven configuration for the server and the terminal client.
//!
//! Both binaries call `dotenvy::dotenv()` first, so a `.env` file in the
//! working directory can supply any of these variables.

use std::{collections::HashMap, env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://localhost:3000/";
pub const DEFAULT_LOG_FILE: &str = "tasktrack.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("TASKTRACK_URL must be a plain http:// URL (no TLS support), got {0:?}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Reads `HOST` and `PORT`; blank values fall back to the defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let host = non_blank(vars, "HOST").unwrap_or(DEFAULT_HOST).to_string();
        let port = match non_blank(vars, "PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    /// `host:port`, resolved by the listener so host names work too.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the task server, always ending in `/`.
    pub api_url: String,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Reads `TASKTRACK_URL` and `TASKTRACK_LOG`.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_url = match non_blank(vars, "TASKTRACK_URL") {
            Some(raw) => normalize_base_url(raw)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let log_file = non_blank(vars, "TASKTRACK_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        Ok(Self { api_url, log_file })
    }
}

fn non_blank<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// The client is built without a TLS stack, so `https://` is refused here
/// rather than failing on the first request.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    if !raw.starts_with("http://") {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    let mut url = raw.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    fn server_defaults() {
        let config = ServerConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[rstest]
    fn server_reads_host_and_port() {
        let config = ServerConfig::from_vars(&vars(&[("HOST", "127.0.0.1"), ("PORT", "8080")]))
            .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[rstest]
    #[case("abc")]
    #[case("70000")]
    #[case("-1")]
    fn server_rejects_bad_port(#[case] port: &str) {
        assert_eq!(
            ServerConfig::from_vars(&vars(&[("PORT", port)])),
            Err(ConfigError::InvalidPort(port.to_string()))
        );
    }

    #[rstest]
    fn client_falls_back_to_localhost() {
        let config = ClientConfig::from_vars(&vars(&[("TASKTRACK_URL", "  ")])).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/");
        assert_eq!(config.log_file, PathBuf::from("tasktrack.log"));
    }

    #[rstest]
    #[case("http://tasks.internal:8000", "http://tasks.internal:8000/")]
    #[case("http://example.com/api/", "http://example.com/api/")]
    fn client_normalizes_base_url(#[case] raw: &str, #[case] expected: &str) {
        let config = ClientConfig::from_vars(&vars(&[("TASKTRACK_URL", raw)])).unwrap();
        assert_eq!(config.api_url, expected);
    }

    #[rstest]
    #[case("localhost:3000")]
    #[case("https://example.com/api/")]
    #[case("ftp://example.com/")]
    fn client_rejects_non_http_url(#[case] raw: &str) {
        assert_eq!(
            ClientConfig::from_vars(&vars(&[("TASKTRACK_URL", raw)])),
            Err(ConfigError::InvalidUrl(raw.to_string()))
        );
    }
}
