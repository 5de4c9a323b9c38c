use std::net::SocketAddr;
use std::path::PathBuf;

use loginguard_core::LimiterConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub limiter: LimiterConfig,
    /// Seconds between idle tracker sweeps. `0` disables the sweep.
    #[serde(default = "default_evict_interval_seconds")]
    pub evict_interval_seconds: u64,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_ttl_hours: default_jwt_ttl_hours(),
        }
    }
}

fn default_jwt_ttl_hours() -> u64 { 24 }
fn default_evict_interval_seconds() -> u64 { 60 }

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9090))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            auth: AuthConfig::default(),
            limiter: LimiterConfig::default(),
            evict_interval_seconds: default_evict_interval_seconds(),
            users: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn find_user(&self, username: &str) -> Option<&UserConfig> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.limiter.validate()?;
        Ok(config)
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("LOGINGUARD_WEB_CONFIG")
            .map(PathBuf::from)
            .ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&contents)?
        } else {
            ServerConfig::default()
        };

        config.limiter.apply_env();

        if let Ok(secret) = std::env::var("LOGINGUARD_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if config.auth.jwt_secret.is_empty() {
            config.auth.jwt_secret = uuid::Uuid::new_v4().to_string();
            tracing::warn!(
                "No JWT secret configured. Generated random secret (will change on restart)."
            );
        }

        if let Ok(addr) = std::env::var("LOGINGUARD_BIND_ADDR") {
            config.bind_addr = addr.parse()?;
        }

        if config.users.is_empty() {
            tracing::warn!("No users configured. Every login will be rejected.");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.limiter, LimiterConfig::default());
        assert_eq!(config.evict_interval_seconds, 60);
        assert_eq!(config.auth.jwt_ttl_hours, 24);
        assert!(config.users.is_empty());
    }

    #[test]
    fn full_file_is_parsed() {
        let config = ServerConfig::from_toml_str(
            r#"
bind_addr = "0.0.0.0:8443"
evict_interval_seconds = 0

[auth]
jwt_secret = "0123456789abcdef0123456789abcdef"
jwt_ttl_hours = 2

[limiter]
window_seconds = 300
max_attempts = 5

[[users]]
username = "alice"
password_hash = "$argon2id$stub"
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8443);
        assert_eq!(config.evict_interval_seconds, 0);
        assert_eq!(config.auth.jwt_ttl_hours, 2);
        assert_eq!(config.limiter, LimiterConfig::new(300, 5).unwrap());
        assert!(config.find_user("alice").is_some());
        assert!(config.find_user("Alice").is_none());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        assert!(ServerConfig::from_toml_str("[limiter]\nmax_attempts = 0\n").is_err());
    }
}
