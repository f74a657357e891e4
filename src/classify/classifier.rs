use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::classify::retry::{AttemptOutcome, RetryState, Sleeper, TokioSleeper};
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::llm::parser::parse_classification;
use crate::llm::ClassificationProvider;
use crate::models::{Classification, ProcessedReview, RawReview};

// Classification never fails outward: recoverable errors are retried and an
// exhausted budget falls back to a rating-derived default, so one bad review
// cannot sink a batch.
pub struct FeedbackClassifier {
    provider: Arc<dyn ClassificationProvider>,
    sleeper: Arc<dyn Sleeper>,
    settings: ClassifierConfig,
}

impl FeedbackClassifier {
    pub fn new(provider: impl ClassificationProvider + 'static, settings: ClassifierConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            sleeper: Arc::new(TokioSleeper),
            settings,
        }
    }

    // Injected clock so tests run without real delays.
    pub fn with_sleeper(
        provider: impl ClassificationProvider + 'static,
        settings: ClassifierConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            sleeper,
            settings,
        }
    }

    pub async fn classify_review(&self, content: &str, rating: u8) -> Classification {
        if content.trim().is_empty() {
            tracing::debug!("Blank review content, skipping {}", self.provider.name());
            return Classification::fallback_for(rating);
        }

        let max_attempts = self.settings.max_retries.max(1);
        let mut state = RetryState::start();
        let mut classified = None;

        while let RetryState::Attempting(attempt) = state {
            match self.attempt(content, rating).await {
                Ok(classification) => {
                    classified = Some(classification);
                    state = state.advance(AttemptOutcome::Success, max_attempts);
                }
                Err(e) => {
                    tracing::warn!(
                        "Classification attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        e
                    );
                    if e.is_recoverable() {
                        state = state.advance(AttemptOutcome::Failure, max_attempts);
                        if !state.is_terminal() {
                            self.sleeper.sleep(self.settings.retry_delay).await;
                        }
                    } else {
                        // Errors retry cannot fix spend the whole budget at once.
                        state = RetryState::Exhausted;
                    }
                }
            }
        }

        match (state, classified) {
            (RetryState::Succeeded, Some(classification)) => classification,
            _ => {
                tracing::error!(
                    "All {} classification attempts failed, using rating-based fallback",
                    max_attempts
                );
                Classification::fallback_for(rating)
            }
        }
    }

    async fn attempt(&self, content: &str, rating: u8) -> Result<Classification> {
        let raw = self.provider.classify(content, rating).await?;
        parse_classification(&raw).map_err(|e| {
            tracing::debug!("Rejected model output: {}", truncate_chars(&raw, 200));
            e
        })
    }

    // Sequential on purpose: output order matches input order and the
    // upstream API is never hit by more than one request at a time.
    pub async fn classify_batch(&self, reviews: &[RawReview]) -> Vec<ProcessedReview> {
        let pb = ProgressBar::new(reviews.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} reviews",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut processed = Vec::with_capacity(reviews.len());
        for review in reviews {
            let classification = self.classify_review(&review.content, review.rating).await;
            processed.push(ProcessedReview::from_parts(review, classification));
            pb.inc(1);

            // Fixed pacing pause after every review, fallbacks included.
            self.sleeper.sleep(self.settings.pacing_delay).await;
        }

        pb.finish_with_message("Classified all reviews");
        processed
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::Error;
    use crate::models::{Priority, Sentiment};

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                responses: Mutex::new(responses.into()),
                calls: calls.clone(),
            };
            (provider, calls)
        }
    }

    #[async_trait]
    impl ClassificationProvider for ScriptedProvider {
        async fn classify(&self, _content: &str, _rating: u8) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::LLMApi("script exhausted".to_string())))
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    fn good_response(category: &str) -> String {
        format!(
            r#"{{"category": "{}", "subcategory": "General", "sentiment": "negative",
                "priority": "high", "summary": "App crashes at login", "keywords": ["crash"]}}"#,
            category
        )
    }

    fn settings() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    fn classifier(provider: ScriptedProvider) -> FeedbackClassifier {
        FeedbackClassifier::with_sleeper(provider, settings(), Arc::new(NoSleep))
    }

    fn raw_review(id: &str, content: &str, rating: u8) -> RawReview {
        RawReview {
            review_id: id.to_string(),
            author: "tester".to_string(),
            rating,
            content: content.to_string(),
            date: None,
            thumbs_up: 0,
            reply_content: None,
            reply_date: None,
        }
    }

    #[tokio::test]
    async fn test_blank_content_skips_provider() {
        let (provider, calls) = ScriptedProvider::new(vec![Ok(good_response("Technical"))]);
        let classifier = classifier(provider);

        let result = classifier.classify_review("   ", 1).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.category, "Other");
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let (provider, calls) = ScriptedProvider::new(vec![
            Err(Error::LLMApi("503".to_string())),
            Err(Error::LLMApi("503".to_string())),
            Ok(good_response("Technical")),
        ]);
        let classifier = classifier(provider);

        let result = classifier.classify_review("crashes on login", 1).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.category, "Technical");
        assert_eq!(result.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_success_stops_retrying() {
        let (provider, calls) = ScriptedProvider::new(vec![
            Ok(good_response("UI/UX")),
            Err(Error::LLMApi("never reached".to_string())),
        ]);
        let classifier = classifier(provider);

        let result = classifier.classify_review("confusing menus", 2).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.category, "UI/UX");
    }

    #[tokio::test]
    async fn test_unparseable_output_exhausts_to_fallback() {
        let (provider, calls) = ScriptedProvider::new(vec![
            Ok("not json at all".to_string()),
            Ok(r#"{"category": "UI/UX"}"#.to_string()),
            Ok("still not json".to_string()),
        ]);
        let classifier = classifier(provider);

        let result = classifier.classify_review("slow and broken", 5).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.category, "Other");
        assert_eq!(result.subcategory, "General Feedback");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_unrecoverable_error_is_not_retried() {
        let (provider, calls) = ScriptedProvider::new(vec![
            Err(Error::Validation("provider misconfigured".to_string())),
            Ok(good_response("UI/UX")),
        ]);
        let classifier = classifier(provider);

        let result = classifier.classify_review("anything", 3).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.category, "Other");
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_batch_preserves_length_and_order() {
        let (provider, calls) = ScriptedProvider::new(vec![
            Ok(good_response("Technical")),
            Ok(good_response("Performance")),
        ]);
        let classifier = classifier(provider);

        let reviews = vec![
            raw_review("r1", "crashes constantly", 1),
            raw_review("r2", "", 4),
            raw_review("r3", "takes forever to load", 2),
        ];
        let processed = classifier.classify_batch(&reviews).await;

        assert_eq!(processed.len(), 3);
        assert_eq!(processed[0].review_id, "r1");
        assert_eq!(processed[1].review_id, "r2");
        assert_eq!(processed[2].review_id, "r3");
        assert_eq!(processed[0].category, "Technical");
        // Blank review never reached the provider, so the second scripted
        // response went to the third review.
        assert_eq!(processed[1].category, "Other");
        assert_eq!(processed[2].category, "Performance");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
