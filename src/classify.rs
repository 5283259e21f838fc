//! Failure classification for backend exchanges.
//!
//! Every failed exchange is reduced to exactly one user-facing message.
//! Classification is a pure, total function over [`ExchangeFailure`], the
//! normalized outcome value the client produces - it never inspects a
//! transport library's error types directly, so it is unit-testable
//! without a network.
//!
//! Priority order:
//! 1. a backend-supplied `detail` string is used verbatim;
//! 2. a timeout pattern yields fixed smaller-file guidance;
//! 3. a connectivity pattern yields fixed check-your-connection guidance;
//! 4. anything else yields a generic fallback.

use thiserror::Error;

/// Fixed guidance shown when the exchange exceeded the time budget.
pub const TIMEOUT_GUIDANCE: &str =
    "Analysis timed out. Please try again with a smaller file.";

/// Fixed guidance shown when the service could not be reached.
pub const NETWORK_GUIDANCE: &str =
    "Unable to reach the analysis service. Please check your connection and try again.";

/// Generic fallback when nothing more specific applies.
pub const GENERIC_GUIDANCE: &str = "Failed to analyze the document. Please try again.";

/// A failed backend exchange, normalized away from the HTTP library's
/// error shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeFailure {
    /// The service answered with an error status, optionally explaining why.
    #[error("analysis service returned HTTP {status}")]
    Backend {
        status: u16,
        detail: Option<String>,
    },
    /// The exchange failed before a usable response arrived.
    #[error("{message}")]
    Transport { message: String },
}

/// How a failure was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend explained the rejection itself.
    BackendReported,
    /// The exchange exceeded the time budget.
    Timeout,
    /// Transport-level connectivity problem.
    NetworkUnavailable,
    /// Anything else.
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackendReported => "rejected",
            Self::Timeout => "timeout",
            Self::NetworkUnavailable => "network",
            Self::Unknown => "error",
        }
    }
}

/// A classified failure: one kind, one human-readable message.
///
/// Immutable once produced; cleared when the user resets the cycle. All
/// kinds are terminal for the current cycle - recovery is always an
/// explicit reset followed by a fresh submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    /// Classify a failed exchange into a single user-facing message.
    pub fn classify(outcome: &ExchangeFailure) -> Self {
        if let ExchangeFailure::Backend {
            detail: Some(detail),
            ..
        } = outcome
        {
            if !detail.trim().is_empty() {
                return Self {
                    kind: FailureKind::BackendReported,
                    message: detail.clone(),
                };
            }
        }

        let text = outcome.to_string().to_lowercase();
        if text.contains("timeout") || text.contains("timed out") {
            Self {
                kind: FailureKind::Timeout,
                message: TIMEOUT_GUIDANCE.to_string(),
            }
        } else if text.contains("network error") {
            Self {
                kind: FailureKind::NetworkUnavailable,
                message: NETWORK_GUIDANCE.to_string(),
            }
        } else {
            Self {
                kind: FailureKind::Unknown,
                message: GENERIC_GUIDANCE.to_string(),
            }
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
