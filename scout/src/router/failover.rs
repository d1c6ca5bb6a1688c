//! Failover state machine for one search session.
//!
//! The machine is pure: the driver in `search.rs` performs the side effects
//! (initialize, reserve, invoke) requested by an [`Action`] and feeds the
//! result back as an [`Event`].

use scout_core::{RecordSet, ScoutError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Selecting,
    Invoking,
    Succeeded,
    Exhausted,
}

#[derive(Debug)]
pub enum Event {
    /// The adapter is disabled; it is passed over without being consulted.
    Ineligible,
    /// The adapter could not be initialized; consulted but not invoked.
    InitFailed { error: ScoutError },
    /// The reservation was refused because the daily quota is spent.
    QuotaRejected { reset_in_ms: u64 },
    /// The adapter answered with at least one canonical record.
    Answered { records: RecordSet, dropped: usize },
    /// The adapter answered but nothing survived normalization.
    Empty { dropped: usize },
    /// The adapter errored or timed out.
    Failed { error: ScoutError },
    /// The caller cancelled before the next invocation.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Invoke { slot: usize },
    Finish,
}

/// Final state handed back to the driver.
#[derive(Debug)]
pub struct SessionOutcome {
    pub phase: Phase,
    pub records: RecordSet,
    pub dropped: usize,
    pub errors: Vec<ScoutError>,
    pub cancelled: bool,
    /// Set when every consulted adapter was out of quota and none was
    /// invoked; holds the soonest reset among them.
    pub quota_only_reset_ms: Option<u64>,
}

#[derive(Debug)]
pub struct FailoverSession {
    /// Registry slots in failover order.
    candidates: Vec<usize>,
    cursor: usize,
    attempt_cap: usize,
    invoked: usize,
    consulted: usize,
    quota_resets: Vec<u64>,
    errors: Vec<ScoutError>,
    records: RecordSet,
    dropped: usize,
    cancelled: bool,
    phase: Phase,
}

impl FailoverSession {
    pub fn new(candidates: Vec<usize>, attempt_cap: usize) -> Self {
        Self {
            candidates,
            cursor: 0,
            attempt_cap: attempt_cap.max(1),
            invoked: 0,
            consulted: 0,
            quota_resets: Vec::new(),
            errors: Vec::new(),
            records: RecordSet::new(),
            dropped: 0,
            cancelled: false,
            phase: Phase::Selecting,
        }
    }

    /// Leave the initial `Selecting` state.
    pub fn start(&mut self) -> Action {
        self.select()
    }

    pub fn handle(&mut self, event: Event) -> Action {
        if self.phase != Phase::Invoking {
            return Action::Finish;
        }
        match event {
            Event::Ineligible => {}
            Event::InitFailed { error } => {
                self.consulted += 1;
                self.errors.push(error);
            }
            Event::QuotaRejected { reset_in_ms } => {
                self.consulted += 1;
                self.quota_resets.push(reset_in_ms);
                self.errors.push(ScoutError::QuotaExceeded {
                    remaining: 0,
                    reset_in_ms,
                });
            }
            Event::Answered { records, dropped } => {
                self.consulted += 1;
                self.invoked += 1;
                self.dropped += dropped;
                self.records = std::mem::take(&mut self.records).union(records);
                self.phase = Phase::Succeeded;
                return Action::Finish;
            }
            Event::Empty { dropped } => {
                self.consulted += 1;
                self.invoked += 1;
                self.dropped += dropped;
            }
            Event::Failed { error } => {
                self.consulted += 1;
                self.invoked += 1;
                self.errors.push(error);
            }
            Event::Cancelled => {
                self.cancelled = true;
                self.phase = Phase::Exhausted;
                return Action::Finish;
            }
        }
        self.phase = Phase::Selecting;
        self.select()
    }

    fn select(&mut self) -> Action {
        if self.invoked >= self.attempt_cap {
            self.phase = Phase::Exhausted;
            return Action::Finish;
        }
        match self.candidates.get(self.cursor) {
            Some(&slot) => {
                self.cursor += 1;
                self.phase = Phase::Invoking;
                Action::Invoke { slot }
            }
            None => {
                self.phase = Phase::Exhausted;
                Action::Finish
            }
        }
    }

    pub fn into_outcome(self) -> SessionOutcome {
        let quota_only = self.invoked == 0
            && self.consulted > 0
            && self.quota_resets.len() == self.consulted;
        SessionOutcome {
            phase: self.phase,
            records: self.records,
            dropped: self.dropped,
            errors: self.errors,
            cancelled: self.cancelled,
            quota_only_reset_ms: if quota_only {
                self.quota_resets.iter().copied().min()
            } else {
                None
            },
        }
    }
}
