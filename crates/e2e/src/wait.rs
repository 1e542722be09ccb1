//! Bounded polling waits

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Delay between two checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `check` until it yields `Some`, or fail with a timeout once
/// `ceiling` has elapsed.
///
/// The check always runs at least once. Errors returned by the check abort the
/// wait immediately; checks that should tolerate a missing element must map
/// that case to `Ok(None)` themselves.
pub async fn wait_until<T, F, Fut>(ceiling: Duration, what: &str, mut check: F) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Option<T>>>,
{
    let start = Instant::now();
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        if let Some(value) = check().await? {
            if attempts > 1 {
                debug!("'{}' satisfied after {} checks", what, attempts);
            }
            return Ok(value);
        }

        if start.elapsed() >= ceiling {
            return Err(E2eError::Timeout {
                what: what.to_string(),
                seconds: ceiling.as_secs_f64(),
            });
        }

        sleep(POLL_INTERVAL.min(ceiling)).await;
    }
}
