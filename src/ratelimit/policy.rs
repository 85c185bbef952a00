use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::time::Duration;

use super::error::RateLimitError;

/// General API traffic
pub const STANDARD_API: &str = "standard-api";
/// Endpoints that exist to exercise error handling
pub const TEST_ERROR: &str = "test-error";
/// Operational endpoints under /actuator
pub const ACTUATOR: &str = "actuator";

/// Named quota: `limit_for_period` permits per `limit_refresh_period`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterPolicy {
    name: String,
    limit_for_period: NonZeroU32,
    limit_refresh_period: Duration,
    timeout_duration: Duration,
}

impl RateLimiterPolicy {
    /// Create a policy that rejects immediately when no permit is free
    pub fn new(
        name: impl Into<String>,
        limit_for_period: NonZeroU32,
        limit_refresh_period: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            limit_for_period,
            limit_refresh_period,
            timeout_duration: Duration::ZERO,
        }
    }

    /// How long a request may wait for a permit before being rejected
    pub fn with_timeout(mut self, timeout_duration: Duration) -> Self {
        self.timeout_duration = timeout_duration;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limit_for_period(&self) -> NonZeroU32 {
        self.limit_for_period
    }

    pub fn limit_refresh_period(&self) -> Duration {
        self.limit_refresh_period
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }

    /// Reject policies that cannot be enforced
    pub(crate) fn validate(&self) -> Result<(), RateLimitError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if self.limit_refresh_period.is_zero() {
            return Err(self.invalid("refresh period must be longer than zero"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> RateLimitError {
        RateLimitError::InvalidPolicy {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// The service's policies, fixed at process start
pub fn default_policies() -> Vec<RateLimiterPolicy> {
    vec![
        RateLimiterPolicy::new(STANDARD_API, nonzero!(300u32), Duration::from_secs(60)),
        RateLimiterPolicy::new(TEST_ERROR, nonzero!(30u32), Duration::from_secs(10)),
        RateLimiterPolicy::new(ACTUATOR, nonzero!(60u32), Duration::from_secs(60)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> RateLimiterPolicy {
        default_policies()
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap()
    }

    #[test]
    fn test_standard_api_policy() {
        let policy = find(STANDARD_API);
        assert_eq!(policy.limit_for_period().get(), 300);
        assert_eq!(policy.limit_refresh_period(), Duration::from_secs(60));
        assert_eq!(policy.timeout_duration(), Duration::ZERO);
    }

    #[test]
    fn test_test_error_policy() {
        let policy = find(TEST_ERROR);
        assert_eq!(policy.limit_for_period().get(), 30);
        assert_eq!(policy.limit_refresh_period(), Duration::from_secs(10));
        assert_eq!(policy.timeout_duration(), Duration::ZERO);
    }

    #[test]
    fn test_actuator_policy() {
        let policy = find(ACTUATOR);
        assert_eq!(policy.limit_for_period().get(), 60);
        assert_eq!(policy.limit_refresh_period(), Duration::from_secs(60));
        assert_eq!(policy.timeout_duration(), Duration::ZERO);
    }

    #[test]
    fn test_default_policies_are_valid() {
        for policy in default_policies() {
            assert!(policy.validate().is_ok(), "{}", policy.name());
        }
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let policy = RateLimiterPolicy::new("broken", nonzero!(5u32), Duration::ZERO);
        assert!(matches!(
            policy.validate(),
            Err(RateLimitError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let policy = RateLimiterPolicy::new("  ", nonzero!(5u32), Duration::from_secs(1));
        assert!(policy.validate().is_err());
    }
}
