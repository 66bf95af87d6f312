use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

pub(crate) const INIT_MAX_DELAY: Duration = Duration::from_secs(10);

pub(crate) async fn wait_with_backoff(
    what: &str,
    attempt: usize,
    max_attempts: usize,
    delay: Duration,
) -> Duration {
    warn!(
        "{} not ready; retrying in {:.1}s (attempt {}/{})",
        what,
        delay.as_secs_f32(),
        attempt,
        max_attempts
    );
    sleep(delay).await;
    next_delay(delay)
}

pub(crate) fn next_delay(current: Duration) -> Duration {
    let next = current.saturating_mul(2).max(Duration::from_millis(1));
    if next > INIT_MAX_DELAY {
        INIT_MAX_DELAY
    } else {
        next
    }
}
