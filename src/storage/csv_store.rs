use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{ProcessedReview, RawReview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

// Raw and processed artifacts live in separate subdirectories so each phase
// can locate the newest file of its kind.
pub struct ReviewStore {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl ReviewStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let raw_dir = data_dir.as_ref().join("raw");
        let processed_dir = data_dir.as_ref().join("processed");
        fs::create_dir_all(&raw_dir)?;
        fs::create_dir_all(&processed_dir)?;
        Ok(Self {
            raw_dir,
            processed_dir,
        })
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn save<T: Serialize>(&self, records: &[T], path: &Path, mode: WriteMode) -> Result<usize> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Fresh files get a UTF-8 BOM and a header row so spreadsheet tools
        // open them cleanly; appends add rows only.
        let fresh = mode == WriteMode::Overwrite || !path.exists();
        let file = if fresh {
            let mut file = File::create(path)?;
            file.write_all("\u{feff}".as_bytes())?;
            file
        } else {
            OpenOptions::new().append(true).open(path)?
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(fresh)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} rows to {}", records.len(), path.display());
        Ok(records.len())
    }

    pub fn load_raw(&self, path: &Path) -> Result<Option<Vec<RawReview>>> {
        self.load(path)
    }

    pub fn load_processed(&self, path: &Path) -> Result<Option<Vec<ProcessedReview>>> {
        self.load(path)
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<Vec<T>>> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        tracing::debug!("Loaded {} rows from {}", records.len(), path.display());
        Ok(Some(records))
    }

    // Header row only, for checking column structure before a typed load.
    pub fn read_header(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers()?;
        Ok(headers.iter().map(String::from).collect())
    }

    // Names every required column the header row lacks, not just the first.
    pub fn validate(&self, headers: &[String], required: &[&str]) -> Result<()> {
        let mut missing = Vec::new();
        for column in required {
            if !headers.iter().any(|h| h.as_str() == *column) {
                missing.push(*column);
            }
        }

        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "Input file is missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    // Trims content, drops blanks, and dedupes on content keeping the first
    // occurrence. Order is otherwise preserved.
    pub fn clean(&self, reviews: Vec<RawReview>) -> Vec<RawReview> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::with_capacity(reviews.len());
        let mut blank = 0usize;
        let mut duplicates = 0usize;

        for mut review in reviews {
            review.content = review.content.trim().to_string();
            if review.content.is_empty() {
                blank += 1;
                continue;
            }
            if !seen.insert(review.content.clone()) {
                duplicates += 1;
                continue;
            }
            cleaned.push(review);
        }

        if blank > 0 {
            tracing::info!("Dropped {} blank reviews", blank);
        }
        if duplicates > 0 {
            tracing::info!(
                "Removed {} duplicate reviews, {} remain",
                duplicates,
                cleaned.len()
            );
        }
        cleaned
    }
}
