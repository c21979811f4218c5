use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for oracle calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, first call included.
    pub max_attempts: u32,
    /// Fixed wait between attempts, in seconds.
    pub backoff_secs: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_secs: u64) -> Self {
        Self {
            max_attempts,
            backoff_secs,
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff(), Duration::from_secs(1));
    }
}
