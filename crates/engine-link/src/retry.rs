use std::time::Duration;

/// Delay between reconnect attempts during the initial connection
/// phase.
pub const RETRY_DELAY: Duration = Duration::from_millis(2_500);
/// Reconnect attempts scheduled after the initial one fails.
pub const RETRY_BUDGET: u32 = 10;

/// Bounded first-connect reconnect policy.
///
/// Retries are scheduled only while the channel has never reached
/// open: once a connection succeeds, any later close is terminal and
/// the surrounding application must reopen explicitly. The budget
/// caps the number of scheduled retries after the initial attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts_left: u32,
    ever_opened: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RETRY_BUDGET)
    }
}

impl RetryPolicy {
    pub fn new(budget: u32) -> Self {
        Self {
            attempts_left: budget,
            ever_opened: false,
        }
    }

    /// Records a successful open; disables all future retries.
    pub fn note_open(&mut self) {
        self.ever_opened = true;
    }

    /// Called after a close. Returns the delay to wait before the
    /// next attempt, or `None` when the channel should stay closed.
    pub fn next_delay(&mut self, delay: Duration) -> Option<Duration> {
        if self.ever_opened || self.attempts_left == 0 {
            return None;
        }
        self.attempts_left -= 1;
        Some(delay)
    }
}
