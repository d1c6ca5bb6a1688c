//! Per-adapter daily quota, cooldown and failure bookkeeping.
//!
//! All state lives behind one mutex. The lock is never held across an await:
//! `reserve` claims its cooldown slot under the lock and then sleeps outside
//! it, so a concurrent `release` from a timeout path never blocks on a waiter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use scout_core::{
    AdapterDescriptor, AdapterKey, AdapterMode, AdapterRuntimeState, Clock, DelayPolicy,
    ScoutError, next_utc_midnight,
};

/// Result of an adapter invocation, as reported back to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The adapter answered (with or without records).
    Success,
    /// The adapter failed; the message is kept as its last error.
    Failure(String),
}

/// Proof that one unit of an adapter's quota was consumed.
///
/// Reservations are consumed by [`QuotaTracker::release`] and cannot be
/// copied, so each one settles exactly once.
#[derive(Debug)]
#[must_use = "a reservation must be released with its outcome"]
pub struct Reservation {
    adapter: AdapterKey,
    epoch: u64,
    slot: DateTime<Utc>,
    waited: Duration,
}

impl Reservation {
    /// Adapter the reservation was granted for.
    pub const fn adapter(&self) -> AdapterKey {
        self.adapter
    }

    /// Time the invocation was scheduled for (after cooldown and delay).
    pub const fn slot(&self) -> DateTime<Utc> {
        self.slot
    }

    /// How long `reserve` blocked before granting.
    pub const fn waited(&self) -> Duration {
        self.waited
    }
}

#[derive(Debug)]
struct Slot {
    daily_quota: u64,
    cooldown: Duration,
    remaining: u64,
    reset_at: DateTime<Utc>,
    last_invocation_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    disabled: bool,
    last_error: Option<String>,
    // Bumped at every daily reset; stale reservations are ignored on release.
    epoch: u64,
}

impl Slot {
    fn new(desc: &AdapterDescriptor, now: DateTime<Utc>) -> Self {
        Self {
            daily_quota: desc.daily_quota,
            cooldown: desc.cooldown,
            remaining: desc.daily_quota,
            reset_at: next_utc_midnight(now),
            last_invocation_at: None,
            consecutive_failures: 0,
            disabled: false,
            last_error: None,
            epoch: 0,
        }
    }

    fn roll_over(&mut self, now: DateTime<Utc>) {
        if now < self.reset_at {
            return;
        }
        self.remaining = self.daily_quota;
        self.consecutive_failures = 0;
        self.disabled = false;
        self.reset_at = next_utc_midnight(now);
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn cooldown_until(&self) -> Option<DateTime<Utc>> {
        let last = self.last_invocation_at?;
        let cooldown = chrono::Duration::from_std(self.cooldown).ok()?;
        last.checked_add_signed(cooldown)
    }

    fn mode(&self, now: DateTime<Utc>) -> AdapterMode {
        if self.disabled {
            AdapterMode::Disabled
        } else if self.cooldown_until().is_some_and(|until| until > now) {
            AdapterMode::CoolingDown
        } else {
            AdapterMode::Active
        }
    }

    fn reset_in(&self, now: DateTime<Utc>) -> u64 {
        millis_between(now, self.reset_at)
    }
}

fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}

fn to_std(delta: chrono::Duration) -> Duration {
    delta.to_std().unwrap_or(Duration::ZERO)
}

/// Gate for every adapter invocation: daily quota, cooldown and
/// failure-threshold disablement.
pub struct QuotaTracker {
    order: Vec<AdapterKey>,
    table: Mutex<HashMap<AdapterKey, Slot>>,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn DelayPolicy>,
    failure_threshold: u32,
}

impl std::fmt::Debug for QuotaTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaTracker")
            .field("adapters", &self.order)
            .field("failure_threshold", &self.failure_threshold)
            .finish_non_exhaustive()
    }
}

impl QuotaTracker {
    /// Create a tracker with one runtime state per descriptor.
    ///
    /// A `failure_threshold` of zero is treated as one.
    pub fn new<'a>(
        descriptors: impl IntoIterator<Item = &'a AdapterDescriptor>,
        clock: Arc<dyn Clock>,
        delay: Arc<dyn DelayPolicy>,
        failure_threshold: u32,
    ) -> Self {
        let now = clock.now();
        let mut order = Vec::new();
        let mut table = HashMap::new();
        for desc in descriptors {
            if table.insert(desc.id, Slot::new(desc, now)).is_none() {
                order.push(desc.id);
            }
        }
        Self {
            order,
            table: Mutex::new(table),
            clock,
            delay,
            failure_threshold: failure_threshold.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AdapterKey, Slot>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unknown(key: AdapterKey) -> ScoutError {
        ScoutError::InvalidArg(format!("unknown adapter '{key}'"))
    }

    fn gate(key: AdapterKey, slot: &Slot, now: DateTime<Utc>) -> Result<(), ScoutError> {
        if slot.disabled {
            return Err(ScoutError::AdapterDisabled {
                adapter: key.to_string(),
                reset_in_ms: slot.reset_in(now),
            });
        }
        if slot.remaining == 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(adapter = %key, "daily quota exhausted");
            return Err(ScoutError::QuotaExceeded {
                remaining: 0,
                reset_in_ms: slot.reset_in(now),
            });
        }
        Ok(())
    }

    /// Check whether `key` could be reserved right now, without consuming
    /// quota or claiming a cooldown slot.
    ///
    /// # Errors
    /// Same as [`reserve`](Self::reserve).
    pub fn check(&self, key: AdapterKey) -> Result<(), ScoutError> {
        let mut table = self.lock();
        let now = self.clock.now();
        let slot = table.get_mut(&key).ok_or_else(|| Self::unknown(key))?;
        slot.roll_over(now);
        Self::gate(key, slot, now)
    }

    /// Consume one unit of `key`'s quota, waiting out its cooldown first.
    ///
    /// The cooldown slot is claimed before the wait, so concurrent callers
    /// queue behind each other instead of overrunning the cadence. The delay
    /// policy's extra wait, keyed by the adapter's consecutive-failure count,
    /// is added on top.
    ///
    /// # Errors
    /// - `QuotaExceeded` when the daily budget is spent (`remaining` is 0).
    /// - `AdapterDisabled` when the adapter crossed its failure threshold.
    /// - `InvalidArg` for an adapter the tracker does not know.
    pub async fn reserve(&self, key: AdapterKey) -> Result<Reservation, ScoutError> {
        let reservation = {
            let mut table = self.lock();
            let now = self.clock.now();
            let slot = table.get_mut(&key).ok_or_else(|| Self::unknown(key))?;
            slot.roll_over(now);
            Self::gate(key, slot, now)?;

            let earliest = slot.cooldown_until().map_or(now, |until| until.max(now));
            let extra = chrono::Duration::from_std(self.delay.delay(slot.consecutive_failures))
                .unwrap_or_else(|_| chrono::Duration::zero());
            let scheduled = earliest.checked_add_signed(extra).unwrap_or(earliest);

            slot.remaining -= 1;
            slot.last_invocation_at = Some(scheduled);

            Reservation {
                adapter: key,
                epoch: slot.epoch,
                slot: scheduled,
                waited: to_std(scheduled - now),
            }
        };

        if !reservation.waited.is_zero() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                adapter = %key,
                wait_ms = u64::try_from(reservation.waited.as_millis()).unwrap_or(u64::MAX),
                "waiting for adapter cooldown"
            );
            tokio::time::sleep(reservation.waited).await;
        }
        Ok(reservation)
    }

    /// Settle a reservation with the invocation's outcome.
    ///
    /// Success clears the failure streak and re-activates the adapter. Failure
    /// extends the streak; reaching the threshold disables the adapter until
    /// the next daily reset. Reservations granted before a reset are ignored.
    pub fn release(&self, reservation: Reservation, outcome: ReleaseOutcome) {
        let mut table = self.lock();
        let now = self.clock.now();
        let Some(slot) = table.get_mut(&reservation.adapter) else {
            return;
        };
        slot.roll_over(now);
        if slot.epoch != reservation.epoch {
            return;
        }
        match outcome {
            ReleaseOutcome::Success => {
                slot.consecutive_failures = 0;
                slot.disabled = false;
            }
            ReleaseOutcome::Failure(msg) => {
                slot.consecutive_failures = slot.consecutive_failures.saturating_add(1);
                slot.last_error = Some(msg);
                if slot.consecutive_failures >= self.failure_threshold && !slot.disabled {
                    slot.disabled = true;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        adapter = %reservation.adapter,
                        failures = slot.consecutive_failures,
                        "adapter disabled until next quota reset"
                    );
                }
            }
        }
    }

    /// Record an error that did not come from a reserved invocation
    /// (initialization, health probe). Quota and failure streak are untouched.
    pub fn record_error(&self, key: AdapterKey, msg: impl Into<String>) {
        if let Some(slot) = self.lock().get_mut(&key) {
            slot.last_error = Some(msg.into());
        }
    }

    /// Re-activate every disabled adapter and clear failure streaks.
    /// Remaining quotas are not refilled.
    pub fn enable_all(&self) {
        let mut table = self.lock();
        for slot in table.values_mut() {
            slot.disabled = false;
            slot.consecutive_failures = 0;
        }
    }

    fn snapshot(key: AdapterKey, slot: &Slot, now: DateTime<Utc>) -> AdapterRuntimeState {
        AdapterRuntimeState {
            adapter_id: key,
            remaining_quota: slot.remaining,
            quota_reset_at: slot.reset_at,
            last_invocation_at: slot.last_invocation_at,
            consecutive_failures: slot.consecutive_failures,
            mode: slot.mode(now),
            last_error: slot.last_error.clone(),
        }
    }

    /// Current state of one adapter, after applying any due daily reset.
    #[must_use]
    pub fn state(&self, key: AdapterKey) -> Option<AdapterRuntimeState> {
        let mut table = self.lock();
        let now = self.clock.now();
        let slot = table.get_mut(&key)?;
        slot.roll_over(now);
        Some(Self::snapshot(key, slot, now))
    }

    /// States of every adapter, in the order they were registered.
    #[must_use]
    pub fn states(&self) -> Vec<AdapterRuntimeState> {
        let mut table = self.lock();
        let now = self.clock.now();
        self.order
            .iter()
            .filter_map(|key| {
                let slot = table.get_mut(key)?;
                slot.roll_over(now);
                Some(Self::snapshot(*key, slot, now))
            })
            .collect()
    }

    /// Failure threshold in effect.
    #[must_use]
    pub const fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }
}
