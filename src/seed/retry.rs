/**
 * Write Retry
 *
 * Seeding issues a burst of writes that can trip transient store
 * contention (serialization failures, deadlocks). Those are retried
 * with exponential backoff plus jitter; every other error surfaces
 * immediately.
 */

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::AppError;

const MAX_ATTEMPTS: u32 = 5;
const BASE_DELAY_MS: u64 = 150;
const JITTER_MS: u64 = 100;

/// Backoff before the attempt numbered `attempt` (zero-based)
fn backoff(attempt: u32) -> Duration {
    let base = BASE_DELAY_MS * 2u64.pow(attempt);
    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);
    Duration::from_millis(base + jitter)
}

/// Run an operation, retrying transient failures up to five attempts
///
/// The operation is a closure returning a fresh future per attempt.
/// Only errors whose `is_transient()` holds are retried; the final
/// transient error is returned as-is once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(label: &str, mut operation: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = backoff(attempt);
                tracing::warn!(
                    "Transient failure in {} (attempt {}/{}), retrying in {:?}: {}",
                    label,
                    attempt + 1,
                    MAX_ATTEMPTS,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
