//! Error types used by the call scheduler.
//!
//! This module defines the failure shapes flowing through an invocation:
//!
//! - [`RawFailure`] — the failure as reported by the remote operation layer
//!   (message plus optional `status` and JSON-encoded `body`).
//! - [`NormalizedError`] — a structured error derived from a parsable body.
//! - [`ServiceError`] — what a settled invocation surfaces: normalized when
//!   possible, the raw failure otherwise.
//! - [`CallError`] — the single rejection type callers observe.
//!
//! The types provide helper methods (`as_label`, `as_message`, `status`) for
//! logging/metrics and test assertions.

use std::time::Duration;
use thiserror::Error;

/// # A failure reported by the remote operation layer.
///
/// This is the shape the completion callback rejects with: a human-readable
/// message, optionally a numeric HTTP-like `status`, and optionally a
/// JSON-encoded `body` the service attached to the response.
///
/// Transport-level failures (connection reset, DNS, a dropped completion
/// handle) carry no `status` and are always classified retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RawFailure {
    /// Human-readable description of the failure.
    pub message: String,
    /// Status code carried by the response, if any.
    pub status: Option<u16>,
    /// JSON-encoded error body supplied by the service, if any.
    pub body: Option<String>,
}

impl RawFailure {
    /// Creates a failure with only a message (no status, no body).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Creates a transport-level failure (no status — always retryable).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Attaches a status code.
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a JSON-encoded error body.
    #[inline]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// # A structured error parsed out of a service-supplied body.
///
/// Produced by [`normalize`](crate::classify::normalize) when the raw
/// failure carries a status and a parsable `{"message": ..., "code": ...}`
/// body. `kind` is the service-defined machine-readable code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (kind={kind}, status={status})")]
pub struct NormalizedError {
    /// Human-readable message from the body (or a generic fallback).
    pub message: String,
    /// Machine-readable code from the body.
    pub kind: String,
    /// Status code copied from the raw failure.
    pub status: u16,
}

/// # The failure a settled invocation surfaces.
///
/// Either a [`NormalizedError`] (body parsed successfully) or the
/// [`RawFailure`] unchanged (no body, or unparsable body). Both terminal
/// failures and retryable failures that exhausted the budget use this shape.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Structured error derived from the service-supplied body.
    #[error(transparent)]
    Normalized(#[from] NormalizedError),

    /// Raw failure surfaced unchanged (normalization was not possible).
    #[error(transparent)]
    Raw(#[from] RawFailure),
}

impl ServiceError {
    /// Returns the carried status code, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Normalized(e) => Some(e.status),
            ServiceError::Raw(e) => e.status,
        }
    }

    /// Returns the machine-readable error kind, if normalized.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ServiceError::Normalized(e) => Some(&e.kind),
            ServiceError::Raw(_) => None,
        }
    }
}

/// # Errors produced by a scheduled call.
///
/// A call's future rejects with exactly one of these; retry decisions are
/// internal and only a final, unretriable outcome reaches the caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The attempt deadline elapsed with no retry budget remaining.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The per-attempt timeout that was exceeded.
        timeout: Duration,
    },

    /// The operation failed synchronously at dispatch, before any callback
    /// could fire. Never retried.
    #[error("dispatch failed: {failure}")]
    Dispatch {
        /// The failure raised by the dispatch itself.
        failure: RawFailure,
    },

    /// The operation reported a failure that is not (or no longer) retryable.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use redial::CallError;
    ///
    /// let err = CallError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "call_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::Timeout { .. } => "call_timeout",
            CallError::Dispatch { .. } => "call_dispatch_failed",
            CallError::Service(ServiceError::Normalized(_)) => "call_service_error",
            CallError::Service(ServiceError::Raw(_)) => "call_raw_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            CallError::Dispatch { failure } => format!("dispatch: {failure}"),
            CallError::Service(e) => format!("service: {e}"),
        }
    }

    /// Returns the status code carried by the underlying failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CallError::Timeout { .. } => None,
            CallError::Dispatch { failure } => failure.status,
            CallError::Service(e) => e.status(),
        }
    }

    /// Whether this is the deadline-exceeded outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CallError::Timeout { .. })
    }
}
