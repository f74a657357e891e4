pub mod classifier;
pub mod retry;

pub use classifier::FeedbackClassifier;
pub use retry::{AttemptOutcome, RetryState, Sleeper, TokioSleeper};
