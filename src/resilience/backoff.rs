//! Exponential retry delay for a tripped breaker.

use std::time::Duration;
use tokio::time::Instant;

/// Delay before the first retry once the failure threshold is reached.
pub const BASE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Delay for a failure streak `overshoot` calls past the threshold.
///
/// Doubles per extra failure: 2s, 4s, 8s, ... Saturates instead of overflowing.
pub fn retry_delay(overshoot: u32) -> Duration {
    BASE_RETRY_DELAY.saturating_mul(2u32.saturating_pow(overshoot))
}

/// Instant after which a retry is allowed, or `None` if it lies beyond
/// what an `Instant` can represent.
pub fn retry_at(last_attempt: Instant, overshoot: u32) -> Option<Instant> {
    last_attempt.checked_add(retry_delay(overshoot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(retry_delay(0), Duration::from_secs(2));
        assert_eq!(retry_delay(1), Duration::from_secs(4));
        assert_eq!(retry_delay(2), Duration::from_secs(8));
        assert_eq!(retry_delay(5), Duration::from_secs(64));
    }

    #[test]
    fn test_backoff_saturates() {
        let max = retry_delay(u32::MAX);
        assert_eq!(max, BASE_RETRY_DELAY.saturating_mul(u32::MAX));
        assert!(retry_delay(40) >= retry_delay(31));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_at_offsets_last_attempt() {
        let now = Instant::now();
        assert_eq!(retry_at(now, 0), Some(now + Duration::from_secs(2)));
        assert_eq!(retry_at(now, 3), Some(now + Duration::from_secs(16)));
    }
}
