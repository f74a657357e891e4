use std::path::PathBuf;
use std::sync::Arc;

use crate::classify::FeedbackClassifier;
use crate::config::{CollectorConfig, REQUIRED_COLUMNS};
use crate::error::{Error, Result};
use crate::pipeline::artifacts;
use crate::playstore::ReviewSource;
use crate::report::InsightReport;
use crate::storage::{ReviewStore, WriteMode};

// Each phase reads its input from disk and writes its output back, so any
// phase can also run alone against the newest artifact of the previous kind.
pub struct ReviewPipeline {
    source: Arc<dyn ReviewSource>,
    classifier: Arc<FeedbackClassifier>,
    store: Arc<ReviewStore>,
    collector: CollectorConfig,
}

impl ReviewPipeline {
    pub fn new(
        source: impl ReviewSource + 'static,
        classifier: FeedbackClassifier,
        store: ReviewStore,
        collector: CollectorConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            classifier: Arc::new(classifier),
            store: Arc::new(store),
            collector,
        }
    }

    // Raw rows are persisted verbatim; cleaning belongs to the classify phase.
    pub async fn collect(&self) -> Result<PathBuf> {
        tracing::info!(
            "Step 1/3: Collecting up to {} reviews for {}",
            self.collector.max_reviews,
            self.source.source_id()
        );

        let reviews = self.source.fetch_reviews(self.collector.max_reviews).await?;
        if reviews.is_empty() {
            return Err(Error::NoData(format!(
                "Source returned no reviews for {}",
                self.source.source_id()
            )));
        }

        let path = self
            .store
            .raw_dir()
            .join(artifacts::raw_artifact_name(self.source.source_id()));
        self.store.save(&reviews, &path, WriteMode::Overwrite)?;

        tracing::info!("Collected {} reviews into {}", reviews.len(), path.display());
        Ok(path)
    }

    // Column structure is checked before the typed load so a malformed file
    // aborts without a single model call.
    pub async fn classify(&self, input: Option<PathBuf>) -> Result<PathBuf> {
        let raw_path = self.resolve_input(
            input,
            self.store.raw_dir(),
            artifacts::RAW_PREFIX,
            "Run collection first.",
        )?;
        tracing::info!("Step 2/3: Classifying reviews from {}", raw_path.display());

        let headers = self.store.read_header(&raw_path)?;
        self.store.validate(&headers, REQUIRED_COLUMNS)?;

        let reviews = self.store.load_raw(&raw_path)?.ok_or_else(|| {
            Error::NoData(format!("Raw artifact {} disappeared", raw_path.display()))
        })?;
        if reviews.is_empty() {
            return Err(Error::Validation(format!(
                "Raw artifact {} contains no data rows",
                raw_path.display()
            )));
        }

        let cleaned = self.store.clean(reviews);
        if cleaned.is_empty() {
            return Err(Error::NoData(
                "No usable reviews left after cleaning".to_string(),
            ));
        }

        let processed = self.classifier.classify_batch(&cleaned).await;

        let out_path = self
            .store
            .processed_dir()
            .join(artifacts::processed_artifact_name());
        self.store.save(&processed, &out_path, WriteMode::Overwrite)?;

        tracing::info!(
            "Classified {} reviews into {}",
            processed.len(),
            out_path.display()
        );
        Ok(out_path)
    }

    pub fn analyze(&self, input: Option<PathBuf>) -> Result<String> {
        let processed_path = self.resolve_input(
            input,
            self.store.processed_dir(),
            artifacts::PROCESSED_PREFIX,
            "Run classification first.",
        )?;
        tracing::info!("Step 3/3: Analyzing {}", processed_path.display());

        let reviews = self.store.load_processed(&processed_path)?.ok_or_else(|| {
            Error::NoData(format!(
                "Processed artifact {} disappeared",
                processed_path.display()
            ))
        })?;
        if reviews.is_empty() {
            return Err(Error::Validation(format!(
                "Processed artifact {} contains no data rows",
                processed_path.display()
            )));
        }

        Ok(InsightReport::from_reviews(&reviews).render())
    }

    // All three phases back to back, each feeding the next its output path.
    pub async fn run(&self) -> Result<String> {
        let raw_path = self.collect().await?;
        let processed_path = self.classify(Some(raw_path)).await?;
        self.analyze(Some(processed_path))
    }

    fn resolve_input(
        &self,
        input: Option<PathBuf>,
        dir: &std::path::Path,
        prefix: &str,
        hint: &str,
    ) -> Result<PathBuf> {
        match input {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::NoData(format!(
                        "Input file {} does not exist",
                        path.display()
                    )));
                }
                Ok(path)
            }
            None => artifacts::most_recent(dir, prefix)?.ok_or_else(|| {
                Error::NoData(format!(
                    "No {}*.csv files found in {}. {}",
                    prefix,
                    dir.display(),
                    hint
                ))
            }),
        }
    }
}
