//! loginguard core library: per-identity login failure limiting.
//!
//! `loginguard-core` tracks authentication failures per identity over a
//! trailing time window and tells the host whether a login should be let
//! through. It performs no I/O and starts no tasks; the host calls into it
//! in-line on its own threads.
//!
//! # Modules
//!
//! - [`registry`]: [`RateLimiterRegistry`], the entry point for the host's lifecycle callbacks.
//! - [`tracker`]: [`FailureTracker`], the sliding window for one identity.
//! - [`clock`]: injectable time source ([`SystemClock`], [`ManualClock`]).
//! - [`config`]: [`LimiterConfig`] loaded from TOML or the environment.
//! - [`event`]: [`AuthEvent`] and [`Verdict`] for Host ↔ Core communication.
//! - [`error`]: Unified error type ([`GuardError`]) and result alias ([`GuardResult`]).

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LimiterConfig;
pub use error::{GuardError, GuardResult};
pub use event::{AuthEvent, Verdict};
pub use registry::RateLimiterRegistry;
pub use tracker::FailureTracker;
