//! Fixed-interval pacing between backend calls.
//!
//! The generative endpoint is rate limited; the batch loop inserts a bounded
//! pause between consecutive calls. The first call goes through immediately,
//! later calls sleep out whatever is left of the interval.

use std::time::{Duration, Instant};

pub struct Pacer {
  interval: Duration,
  last: Option<Instant>,
}

impl Pacer {
  pub fn new(interval: Duration) -> Self {
    Self { interval, last: None }
  }

  /// Wait until a full interval has passed since the previous `pause`.
  pub async fn pause(&mut self) {
    if let Some(last) = self.last {
      let wait = remaining(self.interval, last.elapsed());
      if !wait.is_zero() {
        tokio::time::sleep(wait).await;
      }
    }
    self.last = Some(Instant::now());
  }
}

/// Remainder of `interval` after `elapsed` has already passed.
fn remaining(interval: Duration, elapsed: Duration) -> Duration {
  interval.saturating_sub(elapsed)
}
