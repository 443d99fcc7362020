use std::env;

use crate::error::AppError;

/// Listener configuration, read from the runtime environment:
/// - `BACKEND_HOST` (default `0.0.0.0`)
/// - `BACKEND_PORT` (default `4000`)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = env::var("BACKEND_PORT").unwrap_or_else(|_| "4000".to_string());
        let port = port_raw.parse::<u16>().map_err(|_| {
            AppError::config(format!("BACKEND_PORT must be a valid port number, got {port_raw}"))
        })?;
        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        // Env vars are process-global; only assert on the defaults path when
        // nothing in the environment overrides them.
        if env::var("BACKEND_HOST").is_err() && env::var("BACKEND_PORT").is_err() {
            let config = ServerConfig::from_env().expect("default config");
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 4000);
        }
    }
}
