//! Rate limit policy model

use crate::core::models::Role;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// At most `times` requests per `interval`
///
/// Serialized as `{times, hours, minutes, seconds, milliseconds}`; every
/// interval component defaults to zero but their sum must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicySpec", into = "PolicySpec")]
pub struct RateLimitPolicy {
    times: u32,
    interval: Duration,
}

impl RateLimitPolicy {
    pub fn new(times: u32, interval: Duration) -> Result<Self> {
        if times == 0 {
            return Err(GatewayError::validation("Rate limit times must be greater than 0"));
        }
        if interval.is_zero() {
            return Err(GatewayError::validation("Rate limit interval must be greater than 0"));
        }
        Ok(Self { times, interval })
    }

    pub fn per_second(times: u32) -> Result<Self> {
        Self::new(times, Duration::from_secs(1))
    }

    pub fn per_minute(times: u32) -> Result<Self> {
        Self::new(times, Duration::from_secs(60))
    }

    pub fn times(&self) -> u32 {
        self.times
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Permitted requests per second
    pub fn throughput(&self) -> f64 {
        f64::from(self.times) / self.interval.as_secs_f64()
    }

    /// Whether `self` admits strictly more traffic than `other`
    pub fn is_more_permissive_than(&self, other: &RateLimitPolicy) -> bool {
        self.throughput() > other.throughput()
    }
}

impl std::fmt::Display for RateLimitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} per {:?}", self.times, self.interval)
    }
}

/// Most permissive policy among `roles`, earliest role winning ties
///
/// Returns `None` for an empty role list.
pub fn most_permissive<'a, I>(roles: I) -> Option<RateLimitPolicy>
where
    I: IntoIterator<Item = &'a Role>,
{
    let mut best: Option<RateLimitPolicy> = None;
    for role in roles {
        match best {
            Some(current) if !role.rate_limit.is_more_permissive_than(&current) => {}
            _ => best = Some(role.rate_limit),
        }
    }
    best
}

#[derive(Serialize, Deserialize)]
struct PolicySpec {
    times: u32,
    #[serde(default)]
    hours: u64,
    #[serde(default)]
    minutes: u64,
    #[serde(default)]
    seconds: u64,
    #[serde(default)]
    milliseconds: u64,
}

impl TryFrom<PolicySpec> for RateLimitPolicy {
    type Error = GatewayError;

    fn try_from(spec: PolicySpec) -> Result<Self> {
        let millis = spec
            .hours
            .saturating_mul(3_600_000)
            .saturating_add(spec.minutes.saturating_mul(60_000))
            .saturating_add(spec.seconds.saturating_mul(1000))
            .saturating_add(spec.milliseconds);
        RateLimitPolicy::new(spec.times, Duration::from_millis(millis))
    }
}

impl From<RateLimitPolicy> for PolicySpec {
    fn from(policy: RateLimitPolicy) -> Self {
        let total = policy.interval.as_millis() as u64;
        PolicySpec {
            times: policy.times,
            hours: total / 3_600_000,
            minutes: (total % 3_600_000) / 60_000,
            seconds: (total % 60_000) / 1000,
            milliseconds: total % 1000,
        }
    }
}
