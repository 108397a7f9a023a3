//! Delay between retry attempts.

use rand::Rng;
use std::time::Duration;

use crate::config::schema::RetryConfig;

/// Delay to wait after `failed` attempts under `policy`.
///
/// Doubles from `base_delay_ms` per failed attempt, is capped at
/// `max_delay_ms`, and adds up to 10% random jitter on top of the cap.
/// No failures, or a zero base, means no wait.
pub fn backoff_delay(failed: u32, policy: &RetryConfig) -> Duration {
    if failed == 0 || policy.base_delay_ms == 0 {
        return Duration::ZERO;
    }

    let factor = 1u64.checked_shl(failed - 1).unwrap_or(u64::MAX);
    let capped = policy
        .base_delay_ms
        .saturating_mul(factor)
        .min(policy.max_delay_ms);

    let jitter_ceiling = capped / 10;
    let jitter = match jitter_ceiling {
        0 => 0,
        ceiling => rand::thread_rng().gen_range(0..=ceiling),
    };

    Duration::from_millis(capped.saturating_add(jitter))
}
