// ---------------------------------------------------------------------------
// config.rs — environment-sourced settings for the gateway process
// ---------------------------------------------------------------------------

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: IpAddr,
    pub port: u16,
    pub body_limit: usize,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
            cors_origins: Vec::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl GatewayConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("PORT") {
            config.port = parse("PORT", &raw)?;
        }
        if let Some(raw) = get("HOST") {
            config.host = parse("HOST", &raw)?;
        }
        if let Some(raw) = get("MCP_BODY_LIMIT") {
            config.body_limit = parse("MCP_BODY_LIMIT", &raw)?;
        }
        if let Some(raw) = get("CORS_ALLOWED_ORIGINS") {
            config.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(raw) = get("RUST_LOG_FORMAT") {
            config.log_format = match raw.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "RUST_LOG_FORMAT",
                        value: raw,
                        reason: "expected 'json' or 'pretty'".to_string(),
                    });
                }
            };
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        GatewayConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_listen_on_3000() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("PORT", "8088"),
            ("HOST", "127.0.0.1"),
            ("MCP_BODY_LIMIT", "4096"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("RUST_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8088");
        assert_eq!(config.body_limit, 4096);
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        assert_eq!(load(&[("PORT", "  ")]).unwrap().port, 3000);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = load(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(load(&[("PORT", "70000")]).is_err());
        assert!(load(&[("RUST_LOG_FORMAT", "xml")]).is_err());
    }
}
