//! Lifecycle events emitted by the host authentication pipeline.
//!
//! The host translates what happens during a login into [`AuthEvent`]s and
//! feeds them to [`RateLimiterRegistry::dispatch`](crate::RateLimiterRegistry::dispatch),
//! which answers with a [`Verdict`].

/// Something the host authentication pipeline observed for an identity.
///
/// Events flow **Host → Core**. The core never creates events itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials were accepted; the host asks whether to let the login through.
    Attempt(String),
    /// Credentials were rejected.
    Failure(String),
    /// The login completed.
    Success(String),
    /// The client did not even present usable credentials.
    FailedLogin(String),
    /// A session ended.
    Logout(String),
}

impl AuthEvent {
    /// The identity this event is about.
    pub fn identity(&self) -> &str {
        match self {
            AuthEvent::Attempt(id)
            | AuthEvent::Failure(id)
            | AuthEvent::Success(id)
            | AuthEvent::FailedLogin(id)
            | AuthEvent::Logout(id) => id,
        }
    }
}

/// The limiter's answer to an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    /// The host must reject the login as if the credentials were wrong.
    Deny,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }
}
