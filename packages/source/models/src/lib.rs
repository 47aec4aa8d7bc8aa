#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Endpoint definition and request tuning types.
//!
//! An [`EndpointDefinition`] describes one `ArcGIS` layer to scrape: where
//! it lives, which fields to request, how to identify ourselves, and how
//! politely to pace and retry requests. Definitions are deserialized from
//! TOML.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// An `ArcGIS` query endpoint to scrape, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Unique identifier (e.g., `"arda_churches"`).
    pub id: String,
    /// Human-readable name, used in log messages.
    pub name: String,
    /// Layer query URL, up to and including `.../query`.
    pub url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Attribute fields requested through `outFields`, in order.
    pub out_fields: Vec<String>,
    /// Spatial reference WKID for the envelope and the output geometry.
    #[serde(default = "default_wkid")]
    pub wkid: u32,
    /// Attribute holding the two-letter state abbreviation.
    #[serde(default = "default_state_field")]
    pub state_field: String,
    /// Delay between successive requests.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Timeout and retry behavior for each request.
    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_wkid() -> u32 {
    4326
}

fn default_state_field() -> String {
    "STATE".to_string()
}

/// Uniform random delay between successive requests, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Shortest delay (inclusive).
    pub min_delay_secs: u64,
    /// Longest delay (inclusive).
    pub max_delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 2,
            max_delay_secs: 6,
        }
    }
}

impl PacingConfig {
    /// No delay at all. Used by tests and for local mirrors.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_delay_secs: 0,
            max_delay_secs: 0,
        }
    }

    /// The delay range as `(min, max)` durations, swapped if configured
    /// backwards.
    #[must_use]
    pub fn bounds(&self) -> (Duration, Duration) {
        let lo = self.min_delay_secs.min(self.max_delay_secs);
        let hi = self.min_delay_secs.max(self.max_delay_secs);
        (Duration::from_secs(lo), Duration::from_secs(hi))
    }
}

/// Per-request timeout and bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on each further retry.
    pub base_delay_secs: u64,
    /// Whole-request timeout.
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 2,
            timeout_secs: 60,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (1-based): `base * 2^(attempt - 1)`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_secs(self.base_delay_secs.saturating_mul(factor))
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A fully formatted query URL for one county envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryUrl(String);

impl QueryUrl {
    /// Wraps an already formatted URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
