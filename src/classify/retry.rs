use std::time::Duration;

use async_trait::async_trait;

// Where a per-review classification stands after some number of attempts.
// Attempting(n) is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting(u32),
    Succeeded,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting(1)
    }

    // Pure transition: success is terminal immediately, failure moves to the
    // next attempt until max_attempts have been spent. Terminal states absorb
    // further outcomes.
    pub fn advance(self, outcome: AttemptOutcome, max_attempts: u32) -> Self {
        match (self, outcome) {
            (RetryState::Attempting(_), AttemptOutcome::Success) => RetryState::Succeeded,
            (RetryState::Attempting(n), AttemptOutcome::Failure) if n >= max_attempts => {
                RetryState::Exhausted
            }
            (RetryState::Attempting(n), AttemptOutcome::Failure) => RetryState::Attempting(n + 1),
            (terminal, _) => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded | RetryState::Exhausted)
    }
}

// Clock seam separating retry logic from real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_ends_immediately() {
        let state = RetryState::start().advance(AttemptOutcome::Success, 3);
        assert_eq!(state, RetryState::Succeeded);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failures_walk_to_exhaustion() {
        let mut state = RetryState::start();
        state = state.advance(AttemptOutcome::Failure, 3);
        assert_eq!(state, RetryState::Attempting(2));
        state = state.advance(AttemptOutcome::Failure, 3);
        assert_eq!(state, RetryState::Attempting(3));
        state = state.advance(AttemptOutcome::Failure, 3);
        assert_eq!(state, RetryState::Exhausted);
    }

    #[test]
    fn test_success_on_last_attempt_still_succeeds() {
        let state = RetryState::Attempting(3).advance(AttemptOutcome::Success, 3);
        assert_eq!(state, RetryState::Succeeded);
    }

    #[test]
    fn test_terminal_states_absorb() {
        assert_eq!(
            RetryState::Succeeded.advance(AttemptOutcome::Failure, 3),
            RetryState::Succeeded
        );
        assert_eq!(
            RetryState::Exhausted.advance(AttemptOutcome::Success, 3),
            RetryState::Exhausted
        );
    }

    #[test]
    fn test_single_attempt_budget() {
        let state = RetryState::start().advance(AttemptOutcome::Failure, 1);
        assert_eq!(state, RetryState::Exhausted);
    }
}
