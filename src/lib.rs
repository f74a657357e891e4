pub mod config;
pub mod error;
pub mod models;
pub mod playstore;
pub mod llm;
pub mod taxonomy;
pub mod classify;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use config::{ClassifierConfig, CollectorConfig, Config};
pub use error::{Error, Result};
pub use playstore::{PlayStoreClient, ReviewSource};
pub use llm::{ClassificationProvider, GeminiProvider};
pub use classify::FeedbackClassifier;
pub use pipeline::ReviewPipeline;
pub use report::InsightReport;
pub use storage::{ReviewStore, WriteMode};
