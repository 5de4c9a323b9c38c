use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use loginguard_core::RateLimiterRegistry;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub limiter: Arc<RateLimiterRegistry>,
    /// Stand-in credential for unknown usernames, see [`crate::auth::password::verify_login`].
    pub dummy_hash: Arc<str>,
    /// Revoked JWT token IDs (jti). Tokens in this map are rejected by the auth middleware.
    pub revoked_tokens: Arc<DashMap<String, Instant>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let limiter = RateLimiterRegistry::new(config.limiter);
        let dummy_hash = crate::auth::password::dummy_hash()?;
        Ok(Self::with_parts(config, limiter, dummy_hash))
    }

    pub fn with_parts(config: ServerConfig, limiter: RateLimiterRegistry, dummy_hash: String) -> Self {
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            dummy_hash: Arc::from(dummy_hash),
            revoked_tokens: Arc::new(DashMap::new()),
        }
    }

    /// Forgets revocations older than `ttl`; those tokens have expired anyway.
    pub fn sweep_revoked_tokens(&self, ttl: Duration) -> usize {
        let before = self.revoked_tokens.len();
        self.revoked_tokens
            .retain(|_, revoked_at| revoked_at.elapsed() < ttl);
        before.saturating_sub(self.revoked_tokens.len())
    }
}
