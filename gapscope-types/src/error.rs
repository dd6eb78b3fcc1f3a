use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Capability;

/// Unified error type for the gapscope workspace.
///
/// Covers pre-request validation, backend request failures (status, transport,
/// decoding, timeouts), not-found lookups, and capability mismatches.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GapError {
    /// A gap record lacks what an operation needs before any request is made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid input argument (unknown id, bad option value).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Http {
        /// Endpoint path that was requested, e.g. `/gap_stats`.
        endpoint: String,
        /// Numeric status code of the response.
        status: u16,
    },

    /// The request never produced a response (connect, DNS, TLS, body read).
    #[error("transport error on {endpoint}: {msg}")]
    Transport {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("data issue: {0}")]
    Data(String),

    /// The backend has nothing for the requested resource.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "ticker stats for ABCD".
        what: String,
    },

    /// The configured backend does not implement a capability.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label (e.g. "daily-bars").
        capability: String,
    },

    /// A backend call exceeded the configured timeout.
    #[error("request timed out: {capability}")]
    Timeout {
        /// Capability label for which the request timed out.
        capability: String,
    },
}

impl GapError {
    /// Helper: build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Helper: build an `Http` error for a failed endpoint.
    pub fn http(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `Unsupported` error for a capability.
    #[must_use]
    pub fn unsupported(capability: Capability) -> Self {
        Self::Unsupported {
            capability: capability.to_string(),
        }
    }

    /// Helper: build a `Timeout` error for a capability.
    #[must_use]
    pub fn timeout(capability: Capability) -> Self {
        Self::Timeout {
            capability: capability.to_string(),
        }
    }

    /// True for every failure that happened while talking to the backend.
    ///
    /// Status codes are not distinguished.
    #[must_use]
    pub const fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::Transport { .. }
                | Self::Data(_)
                | Self::NotFound { .. }
                | Self::Timeout { .. }
        )
    }
}

impl From<serde_json::Error> for GapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}
