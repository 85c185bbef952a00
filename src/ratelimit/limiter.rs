use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::error::RateLimitError;
use super::policy::{default_policies, RateLimiterPolicy};

/// Permits handed out in the current refresh cycle
#[derive(Debug)]
struct PermitCycle {
    /// Cycles elapsed since the limiter was created
    index: u128,
    used: u32,
}

/// A policy together with the permit counter enforcing it.
///
/// Time is cut into consecutive refresh periods starting when the limiter is
/// built. Each period hands out at most `limit_for_period` permits and
/// unused permits do not carry over.
pub struct PolicyLimiter {
    policy: RateLimiterPolicy,
    started: Instant,
    cycle: Mutex<PermitCycle>,
}

impl PolicyLimiter {
    pub fn new(policy: RateLimiterPolicy) -> Result<Self, RateLimitError> {
        policy.validate()?;
        Ok(Self {
            policy,
            started: Instant::now(),
            cycle: Mutex::new(PermitCycle { index: 0, used: 0 }),
        })
    }

    pub fn policy(&self) -> &RateLimiterPolicy {
        &self.policy
    }

    /// Take a permit if one is free right now
    pub async fn try_acquire(&self) -> bool {
        self.reserve().await.is_ok()
    }

    /// Take a permit, waiting at most the policy's timeout for one to free up
    pub async fn acquire(&self) -> bool {
        let deadline = Instant::now() + self.policy.timeout_duration();
        loop {
            match self.reserve().await {
                Ok(()) => return true,
                Err(wait_time) => {
                    if Instant::now() + wait_time > deadline {
                        debug!(
                            policy = self.policy.name(),
                            ?wait_time,
                            "Next permit is beyond the wait tolerance"
                        );
                        return false;
                    }
                    debug!(policy = self.policy.name(), ?wait_time, "Waiting for permit");
                    sleep(wait_time).await;
                }
            }
        }
    }

    /// Take a permit from the current cycle, or return the time left until
    /// the next cycle starts
    async fn reserve(&self) -> Result<(), Duration> {
        let mut cycle = self.cycle.lock().await;

        let period = self.policy.limit_refresh_period().as_nanos();
        let elapsed = Instant::now().duration_since(self.started).as_nanos();
        let index = elapsed / period;

        if index != cycle.index {
            cycle.index = index;
            cycle.used = 0;
        }

        if cycle.used < self.policy.limit_for_period().get() {
            cycle.used += 1;
            return Ok(());
        }

        let remaining = period - elapsed % period;
        Err(Duration::from_nanos(u64::try_from(remaining).unwrap_or(u64::MAX)))
    }
}

/// Limiters keyed by policy name, built once at start-up
#[derive(Clone)]
pub struct RateLimiterRegistry {
    limiters: HashMap<String, Arc<PolicyLimiter>>,
}

impl RateLimiterRegistry {
    pub fn new(policies: impl IntoIterator<Item = RateLimiterPolicy>) -> Result<Self, RateLimitError> {
        let mut limiters = HashMap::new();
        for policy in policies {
            let name = policy.name().to_string();
            if limiters.contains_key(&name) {
                return Err(RateLimitError::DuplicatePolicy(name));
            }
            limiters.insert(name, Arc::new(PolicyLimiter::new(policy)?));
        }
        Ok(Self { limiters })
    }

    pub fn with_default_policies() -> Result<Self, RateLimitError> {
        Self::new(default_policies())
    }

    /// Limiter for a named policy
    pub fn limiter(&self, name: &str) -> Result<Arc<PolicyLimiter>, RateLimitError> {
        self.limiters
            .get(name)
            .cloned()
            .ok_or_else(|| RateLimitError::UnknownPolicy(name.to_string()))
    }

    pub async fn try_acquire(&self, name: &str) -> Result<bool, RateLimitError> {
        Ok(self.limiter(name)?.try_acquire().await)
    }

    pub fn policies(&self) -> impl Iterator<Item = &RateLimiterPolicy> {
        self.limiters.values().map(|limiter| limiter.policy())
    }
}
