//! Error taxonomies for registry loading and catalog fetching.

/// Failures while loading the first-party source registry document.
///
/// Fatal to the source list; callers offer a retry that re-invokes the load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Source registry unreachable: {0}")]
    Unreachable(#[source] std::io::Error),

    #[error("Source registry malformed: {0}")]
    Malformed(String),
}

/// A single failed attempt within the fetch strategy chain.
#[derive(Debug, Clone)]
pub struct StrategyFailure {
    /// Strategy name, e.g. `"direct"` or `"proxy-relay"`.
    pub strategy: &'static str,
    pub error: FetchError,
}

impl std::fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

/// Failures while fetching a catalog document from a source URL.
///
/// Per-source and recoverable at the UI level. `CrossOriginBlocked` is kept
/// distinct because its user remedy is "open externally / copy URL" rather
/// than "try again".
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The response body could not be read at all (the browser analog is an
    /// opaque cross-origin response; natively: connect, timeout, or body
    /// read failures).
    #[error("Response not readable: {0}")]
    CrossOriginBlocked(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    /// Every applicable strategy was attempted exactly once and failed.
    /// Carries the per-strategy reasons for diagnostics only.
    #[error("All fetch strategies exhausted ({} attempted)", .0.len())]
    AllStrategiesExhausted(Vec<StrategyFailure>),
}

impl FetchError {
    /// Whether this failure traces back to a cross-origin block, directly or
    /// through an exhausted chain whose attempts include one.
    pub fn is_cross_origin_block(&self) -> bool {
        match self {
            FetchError::CrossOriginBlocked(_) => true,
            FetchError::AllStrategiesExhausted(failures) => {
                failures.iter().any(|f| f.error.is_cross_origin_block())
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_chain_reports_cross_origin_when_any_attempt_was_blocked() {
        let err = FetchError::AllStrategiesExhausted(vec![
            StrategyFailure {
                strategy: "direct",
                error: FetchError::CrossOriginBlocked("opaque response".into()),
            },
            StrategyFailure {
                strategy: "proxy-relay",
                error: FetchError::HttpStatus(502),
            },
        ]);
        assert!(err.is_cross_origin_block());
    }

    #[test]
    fn http_status_is_not_a_cross_origin_block() {
        assert!(!FetchError::HttpStatus(404).is_cross_origin_block());
        let err = FetchError::AllStrategiesExhausted(vec![StrategyFailure {
            strategy: "direct",
            error: FetchError::HttpStatus(500),
        }]);
        assert!(!err.is_cross_origin_block());
    }
}
