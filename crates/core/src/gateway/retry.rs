//! Retry policy: clamped attempt budgets with a fixed backoff.

use bytes::Bytes;
use std::time::Duration;
use url::Url;

use super::Fetcher;
use crate::Error;

/// Resolve a caller-supplied retry limit against the configured cap.
///
/// Values of zero or below, and values above the cap, fall back to the cap
/// itself; anything in `[1, cap]` is used as given.
pub fn effective_retry_limit(requested: i64, cap: u32) -> u32 {
    if requested <= 0 || requested > i64::from(cap) { cap } else { requested as u32 }
}

/// Fetch a URL with up to `attempts` tries and a fixed pause between them.
///
/// The first successful body wins. A retryable failure (transport error,
/// non-2xx status) sleeps `backoff` and tries again; a body read failure
/// aborts immediately. Exhausting the budget yields `FetchExhausted`
/// carrying the attempt count.
pub(crate) async fn fetch_with_retry(
    fetcher: &dyn Fetcher, url: &Url, attempts: u32, backoff: Duration,
) -> Result<Bytes, Error> {
    for attempt in 1..=attempts {
        match fetcher.get(url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_retryable() => {
                tracing::debug!(url = %url, attempt, error = %e, "fetch attempt failed");
                if attempt < attempts {
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::FetchExhausted { url: url.to_string(), attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[test]
    fn test_retry_limit_clamp() {
        assert_eq!(effective_retry_limit(0, 10), 10);
        assert_eq!(effective_retry_limit(-5, 10), 10);
        assert_eq!(effective_retry_limit(15, 10), 10);
        assert_eq!(effective_retry_limit(3, 10), 3);
        assert_eq!(effective_retry_limit(10, 10), 10);
    }

    #[test]
    fn test_retry_limit_clamp_other_cap() {
        assert_eq!(effective_retry_limit(0, 5), 5);
        assert_eq!(effective_retry_limit(6, 5), 5);
        assert_eq!(effective_retry_limit(2, 5), 2);
    }

    /// Fails the first `failures` attempts, then succeeds.
    struct FlakyFetcher {
        calls: AtomicUsize,
        failures: usize,
        read_failure: bool,
    }

    impl FlakyFetcher {
        fn failing_first(failures: usize) -> Self {
            Self { calls: AtomicUsize::new(0), failures, read_failure: false }
        }
    }

    #[async_trait]
    impl Fetcher for FlakyFetcher {
        async fn get(&self, _url: &Url) -> Result<Bytes, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.read_failure {
                return Err(Error::ReadFailure("truncated body".into()));
            }
            if call < self.failures {
                return Err(Error::HttpError("connection refused".into()));
            }
            Ok(Bytes::from_static(b"<html>ok</html>"))
        }
    }

    fn test_url() -> Url {
        Url::parse("http://example.test/a").unwrap()
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let fetcher = FlakyFetcher::failing_first(0);
        let body = fetch_with_retry(&fetcher, &test_url(), 3, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"<html>ok</html>"));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_within_budget() {
        let fetcher = FlakyFetcher::failing_first(2);
        let body = fetch_with_retry(&fetcher, &test_url(), 5, Duration::from_millis(5)).await;
        assert!(body.is_ok());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_counts_attempts_and_backs_off() {
        let fetcher = FlakyFetcher::failing_first(usize::MAX);
        let backoff = Duration::from_millis(30);

        let start = Instant::now();
        let result = fetch_with_retry(&fetcher, &test_url(), 2, backoff).await;
        let elapsed = start.elapsed();

        match result {
            Err(Error::FetchExhausted { attempts, url }) => {
                assert_eq!(attempts, 2);
                assert_eq!(url, "http://example.test/a");
            }
            other => panic!("expected FetchExhausted, got {other:?}"),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        // One backoff between the two attempts, none after the last.
        assert!(elapsed >= backoff);
    }

    #[tokio::test]
    async fn test_read_failure_is_not_retried() {
        let fetcher = FlakyFetcher { calls: AtomicUsize::new(0), failures: 0, read_failure: true };
        let result = fetch_with_retry(&fetcher, &test_url(), 5, Duration::from_millis(5)).await;
        assert!(matches!(result, Err(Error::ReadFailure(_))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
