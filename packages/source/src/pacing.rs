//! Randomized pause between successive county requests.

use std::time::Duration;

use arda_source_models::PacingConfig;
use rand::Rng as _;

/// Draws a delay uniformly from the configured inclusive range, at
/// millisecond resolution.
#[must_use]
pub fn next_delay(pacing: &PacingConfig) -> Duration {
    let (lo, hi) = pacing.bounds();
    if lo == hi {
        return lo;
    }
    let lo_ms = u64::try_from(lo.as_millis()).unwrap_or(u64::MAX);
    let hi_ms = u64::try_from(hi.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::thread_rng().gen_range(lo_ms..=hi_ms))
}
