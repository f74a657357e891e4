use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

// Columns a raw artifact must carry to enter classification. The reply
// columns are written by the collector but stay optional on input.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "review_id",
    "author",
    "rating",
    "content",
    "date",
    "thumbs_up",
];

// Processed artifact columns, in output order.
pub const PROCESSED_COLUMNS: &[&str] = &[
    "review_id",
    "content",
    "rating",
    "date",
    "category",
    "subcategory",
    "sentiment",
    "priority",
    "summary",
    "keywords",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub data_dir: PathBuf,
    pub collector: CollectorConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub app_id: String,
    pub max_reviews: u32,
    pub language: String,
    pub country: String,
    pub page_size: u32,
    pub page_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model: String,
    pub temperature: f32,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub pacing_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY environment variable not set".to_string()))?;

        let data_dir = env::var("REVIEWLENS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let collector = CollectorConfig {
            app_id: env::var("REVIEWLENS_APP_ID")
                .unwrap_or_else(|_| "com.unnes.myunnes".to_string()),
            max_reviews: env::var("REVIEWLENS_MAX_REVIEWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            language: env::var("REVIEWLENS_LANG").unwrap_or_else(|_| "id".to_string()),
            country: env::var("REVIEWLENS_COUNTRY").unwrap_or_else(|_| "id".to_string()),
            page_size: env::var("REVIEWLENS_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            page_delay: duration_from_env("REVIEWLENS_PAGE_DELAY_MS", 1000),
        };

        let classifier = ClassifierConfig {
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            temperature: env::var("GEMINI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.3),
            max_retries: env::var("REVIEWLENS_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay: duration_from_env("REVIEWLENS_RETRY_DELAY_MS", 2000),
            pacing_delay: duration_from_env("REVIEWLENS_PACING_DELAY_MS", 500),
        };

        Ok(Self {
            gemini_api_key,
            data_dir,
            collector,
            classifier,
        })
    }
}

fn duration_from_env(key: &str, default_ms: u64) -> Duration {
    let ms = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            app_id: "com.unnes.myunnes".to_string(),
            max_reviews: 1000,
            language: "id".to_string(),
            country: "id".to_string(),
            page_size: 200,
            page_delay: Duration::from_millis(1000),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.3,
            max_retries: 3,
            retry_delay: Duration::from_millis(2000),
            pacing_delay: Duration::from_millis(500),
        }
    }
}
