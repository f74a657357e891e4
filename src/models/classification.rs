use serde::{Deserialize, Serialize};

// Summary written when the model never produced a usable classification.
pub const FALLBACK_SUMMARY: &str = "Automatic classification unavailable";

// Keyword lists longer than this are truncated at parse time.
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    // 1-2 negative, 3 neutral, 4-5 positive.
    pub fn from_rating(rating: u8) -> Self {
        match rating {
            0..=2 => Sentiment::Negative,
            3 => Sentiment::Neutral,
            _ => Sentiment::Positive,
        }
    }

    // Fixed reporting order.
    pub fn all() -> [Sentiment; 3] {
        [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn all() -> [Priority; 3] {
        [Priority::High, Priority::Medium, Priority::Low]
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub summary: String,
    pub keywords: Vec<String>,
}

impl Classification {
    // Deterministic classification used when the model is unreachable or its
    // output never parses. Sentiment comes from the star rating so aggregate
    // sentiment stays meaningful on total API outage.
    pub fn fallback_for(rating: u8) -> Self {
        Self {
            category: "Other".to_string(),
            subcategory: "General Feedback".to_string(),
            sentiment: Sentiment::from_rating(rating),
            priority: Priority::Low,
            summary: FALLBACK_SUMMARY.to_string(),
            keywords: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_rating() {
        assert_eq!(Sentiment::from_rating(1), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(2), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(3), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(4), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(5), Sentiment::Positive);
    }

    #[test]
    fn test_fallback_is_low_priority_other() {
        for rating in 1..=5 {
            let c = Classification::fallback_for(rating);
            assert_eq!(c.category, "Other");
            assert_eq!(c.subcategory, "General Feedback");
            assert_eq!(c.priority, Priority::Low);
            assert_eq!(c.summary, FALLBACK_SUMMARY);
            assert!(c.keywords.is_empty());
        }
        assert_eq!(Classification::fallback_for(1).sentiment, Sentiment::Negative);
        assert_eq!(Classification::fallback_for(3).sentiment, Sentiment::Neutral);
        assert_eq!(Classification::fallback_for(5).sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
    }
}
