//! Unified error types for pagevault.

/// Unified error types for the pagevault gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// URL failed to parse or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A single fetch attempt failed (transport error or non-2xx status).
    /// Retryable; callers outside the retry loop see `FetchExhausted`.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Every retry attempt failed.
    #[error("FETCH_EXHAUSTED: {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: u32 },

    /// The response arrived but its body could not be read to completion.
    #[error("READ_FAILURE: {0}")]
    ReadFailure(String),

    /// Blob store write failed after a successful fetch.
    #[error("PERSIST_FAILURE: {0}")]
    PersistFailure(String),

    /// Blob store read failed for an id the index considered present.
    #[error("CACHE_INCONSISTENCY: {0}")]
    CacheInconsistency(String),

    /// Unexpected runtime failure (e.g., a fetch task that panicked).
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the retry loop should try again after this failure.
    ///
    /// Only per-attempt transport/status failures are retryable; a body
    /// read failure aborts the fetch immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::HttpError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FetchExhausted { url: "http://example.test/a".into(), attempts: 3 };
        assert!(err.to_string().contains("FETCH_EXHAUSTED"));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn test_retryable() {
        assert!(Error::HttpError("connect refused".into()).is_retryable());
        assert!(!Error::ReadFailure("truncated body".into()).is_retryable());
        assert!(!Error::InvalidUrl("no scheme".into()).is_retryable());
    }
}
