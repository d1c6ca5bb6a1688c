use scout_core::ScoutError;

/// Collapse the errors of a routed operation into one caller-facing error.
///
/// Rules:
/// - If `attempted_any` is false → `Unsupported(capability)`.
/// - If every error is `QuotaExceeded` → `QuotaExceeded` with the soonest reset.
/// - If `not_found_what` is `Some` and every error is `NotFound` → `NotFound(what)`.
/// - Else → `AllBackendsExhausted(errors)`.
pub fn collapse_errors(
    capability: &str,
    attempted_any: bool,
    errors: Vec<ScoutError>,
    not_found_what: Option<String>,
) -> ScoutError {
    if !attempted_any {
        return ScoutError::unsupported(capability);
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, ScoutError::QuotaExceeded { .. }))
    {
        let reset_in_ms = errors
            .iter()
            .filter_map(|e| match e {
                ScoutError::QuotaExceeded { reset_in_ms, .. } => Some(*reset_in_ms),
                _ => None,
            })
            .min()
            .unwrap_or(0);
        return ScoutError::QuotaExceeded {
            remaining: 0,
            reset_in_ms,
        };
    }
    if let Some(what) = not_found_what
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, ScoutError::NotFound { .. }))
    {
        return ScoutError::not_found(what);
    }
    ScoutError::AllBackendsExhausted(errors)
}
