//! Error types for enrichment
//!
//! None of these escape the coordinator: each is folded into an
//! [`EnrichmentFailure`](crate::EnrichmentFailure) for the item it concerns.

/// Diagram renderer failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    /// Service unreachable or returned a server error
    #[error("diagram service unavailable: {0}")]
    Unavailable(String),

    /// Service rejected the diagram source
    #[error("invalid diagram syntax: {0}")]
    InvalidSyntax(String),

    /// Service did not answer in time
    #[error("diagram service timed out")]
    Timeout,
}

/// Image and search provider failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Request could not be completed
    #[error("request failed: {0}")]
    Request(String),

    /// Provider answered with an error status
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider did not answer in time
    #[error("provider timed out")]
    Timeout,
}

impl ProviderError {
    /// Classify a transport error
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Worker pool failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskFailure {
    /// Call exceeded the per-call timeout
    #[error("call timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Run was cancelled while the call was pending
    #[error("call cancelled")]
    Cancelled,

    /// Pool was shut down
    #[error("worker pool closed")]
    PoolClosed,
}

/// Why one enrichment item produced nothing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// Diagram renderer failed
    #[error("{0}")]
    Diagram(#[from] DiagramError),

    /// Image or search provider failed
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Call never completed
    #[error("{0}")]
    Task(#[from] TaskFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_display_is_transparent() {
        let reason = FailureReason::from(DiagramError::Timeout);
        assert_eq!(reason.to_string(), "diagram service timed out");

        let reason = FailureReason::from(TaskFailure::Timeout { millis: 1500 });
        assert_eq!(reason.to_string(), "call timed out after 1500ms");
    }

    #[test]
    fn status_error_display() {
        let err = ProviderError::Status {
            status: 429,
            message: "slow down".into(),
        };
        assert_eq!(err.to_string(), "provider returned status 429: slow down");
    }
}
