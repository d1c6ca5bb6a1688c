use std::fmt;
use std::time::Duration;

use rand::Rng;

/// Extra wait applied before an adapter invocation, on top of the adapter's
/// cooldown.
///
/// `attempt` is the adapter's current consecutive-failure count, so policies
/// can slow down an adapter that keeps failing. Tests typically use
/// [`NoDelay`].
pub trait DelayPolicy: Send + Sync + fmt::Debug {
    /// Wait to apply for the given attempt count.
    fn delay(&self, attempt: u32) -> Duration;
}

/// No additional wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Constant wait regardless of attempt count.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelayPolicy for FixedDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// Base wait plus uniform random jitter of up to `jitter_percent` of the base.
#[derive(Debug, Clone, Copy)]
pub struct JitteredDelay {
    /// Minimum wait.
    pub base: Duration,
    /// Upper bound of the random extra, as a percentage of `base`.
    pub jitter_percent: u32,
}

impl DelayPolicy for JitteredDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        let base_ms = u64::try_from(self.base.as_millis()).unwrap_or(u64::MAX);
        let jitter_range = if self.jitter_percent == 0 {
            1
        } else {
            std::cmp::max(
                1,
                base_ms.saturating_mul(u64::from(self.jitter_percent)) / 100,
            )
        };
        let mut rng = rand::rng();
        Duration::from_millis(base_ms.saturating_add(rng.random_range(0..jitter_range)))
    }
}

/// `base * factor^attempt`, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDelay {
    /// Wait for attempt 0.
    pub base: Duration,
    /// Growth factor per attempt (>= 1).
    pub factor: u32,
    /// Upper bound.
    pub max: Duration,
}

impl DelayPolicy for ExponentialDelay {
    fn delay(&self, attempt: u32) -> Duration {
        let growth = self.factor.max(1).saturating_pow(attempt);
        self.base.saturating_mul(growth).min(self.max)
    }
}
