//! Bounded retry with exponential backoff for transient errors.
//!
//! [`with_retry`] re-runs an async operation while it fails with an
//! error for which [`SourceError::is_transient`] holds (connection
//! failures, timeouts, HTTP 429, HTTP 5xx), up to
//! [`RetryConfig::max_retries`] extra attempts. Backoff starts at
//! [`RetryConfig::base_delay_secs`] and doubles each time.
//!
//! ```ignore
//! let body = retry::with_retry(&config, url, || async {
//!     let response = client.get(url).send().await?;
//!     Ok(response.text().await?)
//! })
//! .await?;
//! ```
//!
//! Permanent failures (HTTP 4xx other than 429, parse errors) are
//! returned immediately.

use std::future::Future;

use arda_source_models::RetryConfig;

use crate::SourceError;

/// Runs `operation`, retrying transient failures per `config`.
///
/// `label` identifies the request in log messages.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    label: &str,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut retries = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && retries < config.max_retries => {
                retries += 1;
                let delay = config.backoff(retries);
                log::warn!(
                    "{label}: {e} (retry {retries}/{} in {delay:?})",
                    config.max_retries
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if retries > 0 {
                    log::error!("{label}: giving up after {retries} retries: {e}");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn no_backoff(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_secs: 0,
            timeout_secs: 1,
        }
    }

    fn server_error() -> SourceError {
        SourceError::Status {
            url: "http://localhost/query".to_string(),
            status: 503,
        }
    }

    #[tokio::test]
    async fn succeeds_first_time() {
        let calls = Cell::new(0);
        let result = with_retry(&no_backoff(3), "test", || {
            calls.set(calls.get() + 1);
            async { Ok::<_, SourceError>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let calls = Cell::new(0);
        let result = with_retry(&no_backoff(3), "test", || {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt < 3 {
                    Err(server_error())
                } else {
                    Ok("body")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(&no_backoff(2), "test", || {
            calls.set(calls.get() + 1);
            async { Err(server_error()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(SourceError::Status { status: 503, .. })
        ));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(&no_backoff(5), "test", || {
            calls.set(calls.get() + 1);
            async {
                Err(SourceError::Status {
                    url: "http://localhost/query".to_string(),
                    status: 404,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(&no_backoff(0), "test", || {
            calls.set(calls.get() + 1);
            async { Err(server_error()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
