//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Calculate the delay before retry number `attempt` (1-based).
///
/// Doubles from `base_ms`, capped at `max_ms`, plus 0-10% jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let b1 = calculate_backoff(1, 100, 2000);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 110);

        let b2 = calculate_backoff(2, 100, 2000);
        assert!(b2.as_millis() >= 200 && b2.as_millis() < 220);

        let max = calculate_backoff(10, 100, 1000);
        assert!(max.as_millis() >= 1000 && max.as_millis() < 1100);
    }

    #[test]
    fn test_no_delay_before_first_attempt() {
        assert_eq!(calculate_backoff(0, 100, 1000), Duration::ZERO);
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let d = calculate_backoff(200, u64::MAX / 2, 5000);
        assert!(d.as_millis() >= 5000);
    }
}
