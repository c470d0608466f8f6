use thiserror::Error;

/// Failure classes surfaced to the caller. Non-critical failures (label
/// lookups, view-tracking pings) never reach this type; they are logged and
/// swallowed at the call site.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A remote fetch failed. The cache is unchanged and the operation is
    /// safe to retry.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A persistence call failed. Whether the cache already reflects the
    /// attempted mutation depends on the path: suggestion decisions are
    /// optimistic, attention-item decisions are pessimistic.
    #[error("failed to persist {what}: {message}")]
    Persist { what: &'static str, message: String },

    /// An operation that needs an open email was called with nothing
    /// selected.
    #[error("no email selected")]
    NoSelection,
}
