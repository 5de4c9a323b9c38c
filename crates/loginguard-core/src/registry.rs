//! Identity → tracker routing.

use std::sync::Arc;

use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::error::{GuardError, GuardResult};
use crate::event::{AuthEvent, Verdict};
use crate::tracker::FailureTracker;

/// Owns one [`FailureTracker`] per identity that has failed and not yet
/// succeeded, and turns the host's lifecycle callbacks into verdicts.
///
/// The map is sharded, so unrelated identities never contend on a single
/// lock. Shard guards are always taken before a tracker's own lock, never
/// after.
pub struct RateLimiterRegistry {
    trackers: DashMap<String, Arc<FailureTracker>>,
    config: LimiterConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiterRegistry {
    /// Registry reading the system clock.
    pub fn new(config: LimiterConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: LimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            trackers: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Decides whether an authenticated identity may log in.
    ///
    /// Never creates a tracker. Unknown identities are always allowed.
    pub fn on_authentication_attempt(&self, identity: &str) -> Verdict {
        // Clone out of the shard so the tracker lock is taken without it.
        let Some(tracker) = self.trackers.get(identity).map(|t| Arc::clone(t.value())) else {
            return Verdict::Allow;
        };

        if tracker.is_severe_failure_rate() {
            tracing::warn!("Login rate limiter prevented login of {identity}");
            Verdict::Deny
        } else {
            Verdict::Allow
        }
    }

    /// Same decision as [`on_authentication_attempt`](Self::on_authentication_attempt),
    /// as a `Result` for hosts that propagate with `?`.
    pub fn check(&self, identity: &str) -> GuardResult<()> {
        match self.on_authentication_attempt(identity) {
            Verdict::Allow => Ok(()),
            Verdict::Deny => Err(GuardError::RateLimited {
                identity: identity.to_string(),
            }),
        }
    }

    /// Records a rejected credential for `identity`.
    pub fn on_authentication_failure(&self, identity: &str) {
        let tracker = self
            .trackers
            .entry(identity.to_string())
            .or_insert_with(|| {
                tracing::debug!("Initializing login failure info for {identity}");
                Arc::new(FailureTracker::new(
                    identity,
                    self.config,
                    Arc::clone(&self.clock),
                ))
            });
        // Recorded under the entry guard so a racing success cannot drop it.
        tracker.record_failure();
    }

    /// Forgets every failure recorded for `identity`.
    pub fn on_authentication_success(&self, identity: &str) {
        if self.trackers.remove(identity).is_some() {
            tracing::debug!("Cleared login failure info for {identity}");
        }
    }

    pub fn on_failed_login_attempt(&self, identity: &str) {
        tracing::trace!("Ignoring failed login attempt for {identity}");
    }

    pub fn on_logout(&self, identity: &str) {
        tracing::trace!("Ignoring logout of {identity}");
    }

    /// Routes `event` to the matching callback.
    ///
    /// Only [`AuthEvent::Attempt`] can yield [`Verdict::Deny`].
    pub fn dispatch(&self, event: &AuthEvent) -> Verdict {
        match event {
            AuthEvent::Attempt(id) => return self.on_authentication_attempt(id),
            AuthEvent::Failure(id) => self.on_authentication_failure(id),
            AuthEvent::Success(id) => self.on_authentication_success(id),
            AuthEvent::FailedLogin(id) => self.on_failed_login_attempt(id),
            AuthEvent::Logout(id) => self.on_logout(id),
        }
        Verdict::Allow
    }

    /// Number of identities currently holding a tracker.
    pub fn tracked_identities(&self) -> usize {
        self.trackers.len()
    }

    /// In-window failures for `identity`, zero if untracked.
    pub fn failure_count(&self, identity: &str) -> usize {
        self.trackers
            .get(identity)
            .map(|t| Arc::clone(t.value()))
            .map_or(0, |t| t.failure_count())
    }

    /// Drops trackers whose failures have all expired and returns how many
    /// were removed.
    ///
    /// An idle tracker answers [`Verdict::Allow`] just like a missing one, so
    /// this only reclaims memory. The registry never calls it on its own.
    pub fn evict_idle(&self) -> usize {
        let before = self.trackers.len();
        self.trackers.retain(|_, tracker| !tracker.is_idle());
        let evicted = before.saturating_sub(self.trackers.len());
        if evicted > 0 {
            tracing::debug!("Evicted {evicted} idle login failure tracker(s)");
        }
        evicted
    }
}

impl std::fmt::Debug for RateLimiterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterRegistry")
            .field("config", &self.config)
            .field("tracked", &self.trackers.len())
            .finish()
    }
}
