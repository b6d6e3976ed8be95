//! # Failure classification and normalization.
//!
//! Maps a [`RawFailure`] from the remote operation into a retry
//! [`Disposition`], and normalizes settling failures into a structured
//! [`NormalizedError`](crate::NormalizedError) when the service supplied a
//! parsable error body.
//!
//! ## Rules
//! - Statuses in [`TERMINAL_STATUSES`] are terminal (client-error class,
//!   retrying is never useful).
//! - Every other status, and the absence of a status (transport-level
//!   failures), is retryable.
//! - Normalization runs only on a path that leads to settlement (terminal,
//!   or retryable with the budget exhausted) — never before another retry.

use serde::Deserialize;

use crate::error::{NormalizedError, RawFailure, ServiceError};

/// Status codes for which retrying is never useful.
pub const TERMINAL_STATUSES: &[u16] = &[400, 401, 403, 404, 409, 412, 413];

/// Retry disposition of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Retrying cannot help; settle immediately.
    Terminal,
    /// May succeed if retried; consumes retry budget.
    Retryable,
}

/// Classifies a raw failure into terminal vs. retryable.
///
/// # Example
/// ```
/// use redial::{classify, Disposition, RawFailure};
///
/// let not_found = RawFailure::new("no such document").with_status(404);
/// assert_eq!(classify(&not_found), Disposition::Terminal);
///
/// let flaky = RawFailure::new("upstream unavailable").with_status(503);
/// assert_eq!(classify(&flaky), Disposition::Retryable);
///
/// let transport = RawFailure::transport("connection reset");
/// assert_eq!(classify(&transport), Disposition::Retryable);
/// ```
pub fn classify(failure: &RawFailure) -> Disposition {
    match failure.status {
        Some(status) if TERMINAL_STATUSES.contains(&status) => Disposition::Terminal,
        _ => Disposition::Retryable,
    }
}

/// Error body shape services attach to failed responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// Normalizes a settling failure into a [`ServiceError`].
///
/// If the failure carries a status and a body that parses as
/// `{"message": ..., "code": ...}`, produces a
/// [`NormalizedError`](crate::NormalizedError) with the body's message (or a
/// generic fallback), `kind` set to the body's code, and the status copied
/// over. Otherwise the raw failure is surfaced unchanged.
pub fn normalize(failure: RawFailure) -> ServiceError {
    let Some(status) = failure.status else {
        return ServiceError::Raw(failure);
    };
    let Some(body) = failure.body.as_deref() else {
        return ServiceError::Raw(failure);
    };

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message,
            code: Some(code),
        }) => ServiceError::Normalized(NormalizedError {
            message: message.unwrap_or_else(|| "remote operation failed".to_string()),
            kind: code,
            status,
        }),
        _ => ServiceError::Raw(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_terminal() {
        for status in [400u16, 401, 403, 404, 409, 412, 413] {
            let f = RawFailure::new("nope").with_status(status);
            assert_eq!(classify(&f), Disposition::Terminal, "status {status}");
        }
    }

    #[test]
    fn other_statuses_are_retryable() {
        for status in [408u16, 429, 500, 502, 503, 504] {
            let f = RawFailure::new("try again").with_status(status);
            assert_eq!(classify(&f), Disposition::Retryable, "status {status}");
        }
    }

    #[test]
    fn missing_status_is_retryable() {
        let f = RawFailure::transport("connection reset");
        assert_eq!(classify(&f), Disposition::Retryable);
    }

    #[test]
    fn normalize_parses_message_and_code() {
        let f = RawFailure::new("http error")
            .with_status(500)
            .with_body(r#"{"message":"m","code":"C"}"#);
        match normalize(f) {
            ServiceError::Normalized(e) => {
                assert_eq!(e.message, "m");
                assert_eq!(e.kind, "C");
                assert_eq!(e.status, 500);
            }
            other => panic!("expected normalized error, got {other:?}"),
        }
    }

    #[test]
    fn normalize_falls_back_to_generic_message() {
        let f = RawFailure::new("http error")
            .with_status(409)
            .with_body(r#"{"code":"Conflict"}"#);
        match normalize(f) {
            ServiceError::Normalized(e) => {
                assert_eq!(e.message, "remote operation failed");
                assert_eq!(e.kind, "Conflict");
                assert_eq!(e.status, 409);
            }
            other => panic!("expected normalized error, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_body_surfaces_raw() {
        let f = RawFailure::new("http error")
            .with_status(500)
            .with_body("not json at all");
        assert_eq!(normalize(f.clone()), ServiceError::Raw(f));
    }

    #[test]
    fn body_without_code_surfaces_raw() {
        let f = RawFailure::new("http error")
            .with_status(500)
            .with_body(r#"{"message":"m"}"#);
        assert_eq!(normalize(f.clone()), ServiceError::Raw(f));
    }

    #[test]
    fn missing_body_surfaces_raw() {
        let f = RawFailure::new("http error").with_status(500);
        assert_eq!(normalize(f.clone()), ServiceError::Raw(f));
    }

    #[test]
    fn missing_status_surfaces_raw() {
        let f = RawFailure::transport("reset").with_body(r#"{"code":"C"}"#);
        assert_eq!(normalize(f.clone()), ServiceError::Raw(f));
    }
}
