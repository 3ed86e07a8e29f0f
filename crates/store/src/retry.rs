//! Exponential-backoff retry for transient storage failures.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::StorageError;

/// Total attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles per subsequent retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Run `op`, retrying transient failures with exponential backoff.
///
/// Non-transient errors surface immediately. Once attempts are exhausted the
/// last transient error is wrapped in [`StorageError::RetriesExhausted`].
pub fn with_retry<T>(op: impl FnMut() -> Result<T, StorageError>) -> Result<T, StorageError> {
    with_retry_config(op, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
}

pub fn with_retry_config<T>(
    mut op: impl FnMut() -> Result<T, StorageError>,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, StorageError> {
    let mut attempt: u32 = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                warn!(
                    error = %err,
                    attempt = attempt + 1,
                    max_attempts,
                    "transient storage failure; retrying"
                );
                thread::sleep(base_delay * 2u32.pow(attempt));
                attempt += 1;
            }
            Err(err) if err.is_transient() => {
                return Err(StorageError::RetriesExhausted {
                    attempts: max_attempts,
                    source: Box::new(err),
                });
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medledger_core::ItemId;

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = with_retry_config(
            || {
                calls += 1;
                if calls < 3 {
                    Err(StorageError::Unavailable("flaky".into()))
                } else {
                    Ok(42)
                }
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry_config(
            || {
                calls += 1;
                Err(StorageError::DeadlineExceeded("slow".into()))
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(calls, 3);
        match result.unwrap_err() {
            StorageError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.is_transient());
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[test]
    fn non_transient_errors_surface_immediately() {
        let mut calls = 0;
        let missing = ItemId::new();
        let result: Result<(), _> = with_retry_config(
            || {
                calls += 1;
                Err(StorageError::ItemNotFound(missing))
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(calls, 1);
        assert!(matches!(
            result.unwrap_err(),
            StorageError::ItemNotFound(id) if id == missing
        ));
    }
}
