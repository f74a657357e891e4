use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{Classification, Priority, Sentiment};

// Field order doubles as the raw artifact's column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReview {
    pub review_id: String,
    pub author: String,
    pub rating: u8,
    pub content: String,
    #[serde(with = "flexible_date")]
    pub date: Option<DateTime<Utc>>,
    pub thumbs_up: u32,
    #[serde(default)]
    pub reply_content: Option<String>,
    #[serde(default, with = "flexible_date")]
    pub reply_date: Option<DateTime<Utc>>,
}

// Join of the surviving raw fields and the classification, one-to-one on
// review_id. Field order is the processed artifact's column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedReview {
    pub review_id: String,
    pub content: String,
    pub rating: u8,
    #[serde(with = "flexible_date")]
    pub date: Option<DateTime<Utc>>,
    pub category: String,
    pub subcategory: String,
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub summary: String,
    #[serde(with = "joined_keywords")]
    pub keywords: Vec<String>,
}

impl ProcessedReview {
    pub fn from_parts(review: &RawReview, classification: Classification) -> Self {
        Self {
            review_id: review.review_id.clone(),
            content: review.content.clone(),
            rating: review.rating,
            date: review.date,
            category: classification.category,
            subcategory: classification.subcategory,
            sentiment: classification.sentiment,
            priority: classification.priority,
            summary: classification.summary,
            keywords: classification.keywords,
        }
    }
}

// Date codec for CSV cells: RFC 3339 out, tolerant parsing in. Anything
// unparseable loads as None instead of failing the row.
pub mod flexible_date {
    use super::*;
    use serde::{Deserializer, Serializer};

    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.to_rfc3339()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(parse(&raw))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Some(naive.and_utc());
            }
        }

        None
    }
}

// Keyword list as a single CSV cell, "; "-joined.
pub mod joined_keywords {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(keywords: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&keywords.join("; "))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }
}
