//! Bounded waiting for slow control-plane operations.
//!
//! Two flavors: [`wait_while`] polls a condition until it clears or the
//! iteration budget runs out, and [`with_deadline`] wraps a single blocking
//! gateway call under a hard timeout. Exceeding either bound is an ordinary
//! outcome, never a fault.

use std::future::Future;
use std::time::Duration;

use crate::domain::gateway::{GatewayError, GatewayResult};

/// Poll `condition` at `interval` while it holds. Returns `true` once the
/// condition clears, `false` after `ceil(timeout / interval)` checks.
///
/// The condition is checked immediately, so a condition that is already
/// false resolves without sleeping.
pub async fn wait_while<F, Fut>(mut condition: F, interval: Duration, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let max_checks = (timeout.as_secs_f64() / interval.as_secs_f64()).ceil() as u64;
    let mut checks = 0u64;
    while condition().await {
        checks += 1;
        if checks >= max_checks {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
    true
}

/// Outcome of a single gateway call bounded by a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    TimedOut,
    Unavailable,
}

/// Run one gateway call, aborting it once `deadline` elapses. Both the
/// elapsed deadline and a gateway-reported timeout map to
/// [`CallOutcome::TimedOut`].
pub async fn with_deadline<F>(call: F, deadline: Duration) -> CallOutcome
where
    F: Future<Output = GatewayResult<()>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(())) => CallOutcome::Ok,
        Ok(Err(GatewayError::Timeout)) => CallOutcome::TimedOut,
        Ok(Err(GatewayError::Unavailable)) => CallOutcome::Unavailable,
        Err(_) => CallOutcome::TimedOut,
    }
}
