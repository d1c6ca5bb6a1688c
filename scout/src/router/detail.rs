use std::sync::atomic::Ordering;

use scout_core::{RecordDetail, ScoutError, normalize, residual_attributes};
use scout_middleware::ReleaseOutcome;

use super::util::collapse_errors;
use crate::Scout;

impl Scout {
    /// Fetch the full record behind a `source_uri`.
    ///
    /// Adapters exposing the record-detail capability are tried in failover
    /// order under the same session lock, quota and timeout discipline as a
    /// search. The first usable answer wins; fields the normalizer does not
    /// map are returned as `attributes`.
    ///
    /// # Errors
    /// - `InvalidArg` for a blank URI.
    /// - `Unsupported` when no eligible adapter offers record details.
    /// - `QuotaExceeded` when every capable adapter was out of quota.
    /// - `NotFound` when every adapter answered that the record is unknown.
    /// - `AllBackendsExhausted` otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "scout::router::record_detail", skip(self))
    )]
    pub async fn record_detail(&self, source_uri: &str) -> Result<RecordDetail, ScoutError> {
        let source_uri = source_uri.trim();
        if source_uri.is_empty() {
            return Err(ScoutError::InvalidArg("source_uri must not be empty".into()));
        }
        let _session = self.session.lock().await;
        if self.fallback_only.load(Ordering::SeqCst) {
            return Err(ScoutError::AllBackendsExhausted(Vec::new()));
        }

        let mut attempted_any = false;
        let mut errors = Vec::new();
        for entry in self.registry.entries() {
            if !entry.supports_detail() {
                continue;
            }
            let key = entry.key();
            match self.quota.check(key) {
                Ok(()) => attempted_any = true,
                Err(e @ ScoutError::QuotaExceeded { .. }) => {
                    attempted_any = true;
                    errors.push(e);
                    continue;
                }
                Err(_) => continue,
            }

            if let Err(error) = entry.ensure_initialized().await {
                self.quota.record_error(key, error.to_string());
                errors.push(error);
                continue;
            }
            let reservation = match self.quota.reserve(key).await {
                Ok(r) => r,
                Err(e @ ScoutError::QuotaExceeded { .. }) => {
                    errors.push(e);
                    continue;
                }
                Err(_) => continue,
            };

            let result = Self::adapter_call_with_timeout(
                key,
                "record_detail",
                self.cfg.adapter_timeout,
                async {
                    match entry.adapter.as_detail_provider() {
                        Some(p) => p.record_detail(source_uri).await,
                        None => Err(ScoutError::unsupported("record_detail")),
                    }
                },
            )
            .await;

            match result {
                Ok(raw) => {
                    match normalize(&raw, key, entry.descriptor.trust, self.clock.now()) {
                        Some(record) => {
                            self.quota.release(reservation, ReleaseOutcome::Success);
                            return Ok(RecordDetail {
                                record,
                                attributes: residual_attributes(&raw),
                            });
                        }
                        None => {
                            let error = ScoutError::backend(
                                key.as_str(),
                                "record detail missing mandatory fields",
                            );
                            self.quota
                                .release(reservation, ReleaseOutcome::Failure(error.to_string()));
                            errors.push(error);
                        }
                    }
                }
                Err(e @ ScoutError::NotFound { .. }) => {
                    // The adapter answered; an unknown record is not a failure.
                    self.quota.release(reservation, ReleaseOutcome::Success);
                    errors.push(e);
                }
                Err(e) => {
                    let error = e.tagged(key.as_str());
                    #[cfg(feature = "tracing")]
                    tracing::warn!(adapter = %key, error = %error, "record detail attempt failed");
                    self.quota
                        .release(reservation, ReleaseOutcome::Failure(error.to_string()));
                    errors.push(error);
                }
            }
        }

        Err(collapse_errors(
            "record_detail",
            attempted_any,
            errors,
            Some(format!("record detail for {source_uri}")),
        ))
    }
}
