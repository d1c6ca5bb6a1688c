use std::sync::atomic::Ordering;

use scout_core::{
    Attempt, AttemptOutcome, CanonicalRecord, Provenance, Query, RecordSet,
    SYNTHETIC_ADAPTER_ID, ScoutError, SearchReport, SessionStatus, normalize_all,
};
use scout_middleware::ReleaseOutcome;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::failover::{Action, Event, FailoverSession, Phase, SessionOutcome};
use crate::Scout;

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl Scout {
    /// Run one search session.
    ///
    /// Behavior:
    /// - Adapters are consulted strictly in failover order (ascending
    ///   priority, then registration order), one at a time.
    /// - The first adapter whose answer survives normalization ends the
    ///   session as `Succeeded`; failures and empty answers move on to the
    ///   next adapter until `attempt_cap` adapters have been invoked.
    /// - Exhausted sessions return synthetic placeholders (`Partial`) when a
    ///   fallback generator is configured.
    ///
    /// # Errors
    /// - `InvalidArg` for an empty query or a zero limit.
    /// - `QuotaExceeded` when every consulted adapter was out of quota.
    /// - `AllBackendsExhausted` when no adapter produced records and no
    ///   fallback is configured.
    pub async fn search(&self, text: &str, limit: usize) -> Result<SearchReport, ScoutError> {
        self.search_with_cancel(text, limit, &CancellationToken::new())
            .await
    }

    /// Like [`search`](Self::search), with cooperative cancellation.
    ///
    /// The token is checked before each adapter invocation, never during one.
    /// A cancelled session returns `Ok` with status `Exhausted`, no records
    /// and `cancelled` set; the fallback generator is not consulted.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "scout::router::search",
            skip(self, cancel),
            fields(limit = limit),
        )
    )]
    pub async fn search_with_cancel(
        &self,
        text: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<SearchReport, ScoutError> {
        let query = Query::new(text, limit)?;
        let _session = self.session.lock().await;

        let candidates: Vec<usize> = if self.fallback_only.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            (0..self.registry.len()).collect()
        };
        let mut sm = FailoverSession::new(candidates, self.cfg.attempt_cap);
        let mut attempts = Vec::new();

        let mut action = sm.start();
        while let Action::Invoke { slot } = action {
            let event = if cancel.is_cancelled() {
                Event::Cancelled
            } else {
                self.attempt_search(slot, &query, &mut attempts).await
            };
            action = sm.handle(event);
        }

        self.conclude(query, sm.into_outcome(), attempts)
    }

    async fn attempt_search(&self, slot: usize, query: &Query, log: &mut Vec<Attempt>) -> Event {
        let Some(entry) = self.registry.get(slot) else {
            return Event::Ineligible;
        };
        let key = entry.key();
        let started = Instant::now();

        // Spent or disabled adapters are skipped before they are initialized.
        match self.quota.check(key) {
            Ok(()) => {}
            Err(ScoutError::QuotaExceeded { reset_in_ms, .. }) => {
                log.push(Attempt {
                    adapter_id: key,
                    outcome: AttemptOutcome::QuotaExceeded,
                    duration_ms: elapsed_ms(started),
                });
                return Event::QuotaRejected { reset_in_ms };
            }
            Err(_) => return Event::Ineligible,
        }

        if let Err(error) = entry.ensure_initialized().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(adapter = %key, error = %error, "adapter initialization failed");
            self.quota.record_error(key, error.to_string());
            log.push(Attempt {
                adapter_id: key,
                outcome: AttemptOutcome::InitializationFailed {
                    error: error.clone(),
                },
                duration_ms: elapsed_ms(started),
            });
            return Event::InitFailed { error };
        }

        let reservation = match self.quota.reserve(key).await {
            Ok(r) => r,
            Err(ScoutError::QuotaExceeded { reset_in_ms, .. }) => {
                log.push(Attempt {
                    adapter_id: key,
                    outcome: AttemptOutcome::QuotaExceeded,
                    duration_ms: elapsed_ms(started),
                });
                return Event::QuotaRejected { reset_in_ms };
            }
            Err(_) => return Event::Ineligible,
        };

        let result = Self::adapter_call_with_timeout(
            key,
            "search",
            self.cfg.adapter_timeout,
            entry.adapter.search(query),
        )
        .await;

        match result {
            Ok(raws) => {
                self.quota.release(reservation, ReleaseOutcome::Success);
                let normalized =
                    normalize_all(&raws, key, entry.descriptor.trust, self.clock.now());
                let dropped = normalized.dropped;
                if normalized.records.is_empty() {
                    log.push(Attempt {
                        adapter_id: key,
                        outcome: AttemptOutcome::Empty,
                        duration_ms: elapsed_ms(started),
                    });
                    Event::Empty { dropped }
                } else {
                    log.push(Attempt {
                        adapter_id: key,
                        outcome: AttemptOutcome::Success {
                            records: normalized.records.len(),
                        },
                        duration_ms: elapsed_ms(started),
                    });
                    Event::Answered {
                        records: normalized.records,
                        dropped,
                    }
                }
            }
            Err(e) => {
                let error = e.tagged(key.as_str());
                #[cfg(feature = "tracing")]
                tracing::warn!(adapter = %key, error = %error, "adapter attempt failed");
                self.quota
                    .release(reservation, ReleaseOutcome::Failure(error.to_string()));
                log.push(Attempt {
                    adapter_id: key,
                    outcome: AttemptOutcome::Failed {
                        error: error.clone(),
                    },
                    duration_ms: elapsed_ms(started),
                });
                Event::Failed { error }
            }
        }
    }

    fn conclude(
        &self,
        query: Query,
        outcome: SessionOutcome,
        attempts: Vec<Attempt>,
    ) -> Result<SearchReport, ScoutError> {
        let SessionOutcome {
            phase,
            records,
            dropped,
            errors,
            cancelled,
            quota_only_reset_ms,
        } = outcome;
        let limit = query.limit();
        let report = |status, records: RecordSet, warnings| {
            let mut ranked = records.into_ranked();
            ranked.truncate(limit);
            SearchReport {
                query: query.clone(),
                status,
                records: ranked,
                attempts: attempts.clone(),
                dropped,
                cancelled,
                warnings,
            }
        };

        if phase == Phase::Succeeded {
            return Ok(report(SessionStatus::Succeeded, records, errors));
        }
        if cancelled {
            #[cfg(feature = "tracing")]
            tracing::info!("search session cancelled");
            return Ok(report(SessionStatus::Exhausted, RecordSet::new(), errors));
        }
        if let Some(reset_in_ms) = quota_only_reset_ms {
            return Err(ScoutError::QuotaExceeded {
                remaining: 0,
                reset_in_ms,
            });
        }
        if let Some(fallback) = &self.fallback {
            let placeholders: RecordSet = fallback
                .generate(&query)
                .into_iter()
                .map(as_synthetic)
                .collect();
            if !placeholders.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    placeholders = placeholders.len(),
                    "all adapters exhausted; serving synthetic fallback"
                );
                return Ok(report(SessionStatus::Partial, placeholders, errors));
            }
        }
        Err(ScoutError::AllBackendsExhausted(errors))
    }
}

fn as_synthetic(record: CanonicalRecord) -> CanonicalRecord {
    CanonicalRecord {
        provenance: Provenance {
            adapter_id: SYNTHETIC_ADAPTER_ID.to_string(),
            ..record.provenance
        },
        ..record
    }
}
