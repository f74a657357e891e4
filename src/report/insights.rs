use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Priority, ProcessedReview, Sentiment};

const TOP_CATEGORIES: usize = 5;
const TOP_ISSUES: usize = 5;
const SUMMARY_WIDTH: usize = 70;

// Counting happens once in from_reviews; render only formats.
pub struct InsightReport {
    total: usize,
    average_rating: f64,
    date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    category_counts: Vec<(String, usize)>,
    sentiment_counts: Vec<(Sentiment, usize)>,
    priority_counts: Vec<(Priority, usize)>,
    high_priority_issues: Vec<(String, String)>,
    rating_counts: [usize; 5],
}

impl InsightReport {
    pub fn from_reviews(reviews: &[ProcessedReview]) -> Self {
        let total = reviews.len();
        let average_rating = if total == 0 {
            0.0
        } else {
            reviews.iter().map(|r| r.rating as f64).sum::<f64>() / total as f64
        };

        let dates: Vec<DateTime<Utc>> = reviews.iter().filter_map(|r| r.date).collect();
        let date_range = match (dates.iter().min(), dates.iter().max()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        };

        let mut by_category: HashMap<&str, usize> = HashMap::new();
        for review in reviews {
            *by_category.entry(review.category.as_str()).or_insert(0) += 1;
        }
        let mut category_counts: Vec<(String, usize)> = by_category
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        // Count descending, name ascending on ties, so output is stable.
        category_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let sentiment_counts = Sentiment::all()
            .iter()
            .map(|s| (*s, reviews.iter().filter(|r| r.sentiment == *s).count()))
            .collect();
        let priority_counts = Priority::all()
            .iter()
            .map(|p| (*p, reviews.iter().filter(|r| r.priority == *p).count()))
            .collect();

        let high_priority_issues = reviews
            .iter()
            .filter(|r| r.priority == Priority::High)
            .take(TOP_ISSUES)
            .map(|r| (r.category.clone(), r.summary.clone()))
            .collect();

        let mut rating_counts = [0usize; 5];
        for review in reviews {
            if (1..=5).contains(&review.rating) {
                rating_counts[(review.rating - 1) as usize] += 1;
            }
        }

        Self {
            total,
            average_rating,
            date_range,
            category_counts,
            sentiment_counts,
            priority_counts,
            high_priority_issues,
            rating_counts,
        }
    }

    pub fn render(&self) -> String {
        if self.total == 0 {
            return "No reviews to analyze.".to_string();
        }

        let mut lines = Vec::new();
        lines.push("=".repeat(60));
        lines.push("REVIEW ANALYSIS SUMMARY".to_string());
        lines.push("=".repeat(60));
        lines.push(String::new());

        lines.push(format!("Total reviews: {}", self.total));
        lines.push(format!("Average rating: {:.2} / 5", self.average_rating));
        if let Some((first, last)) = self.date_range {
            lines.push(format!(
                "Date range: {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
        }

        lines.push(String::new());
        lines.push("--- Top Categories ---".to_string());
        for (name, count) in self.category_counts.iter().take(TOP_CATEGORIES) {
            lines.push(format!("{}: {} ({:.1}%)", name, count, self.percent(*count)));
        }

        lines.push(String::new());
        lines.push("--- Sentiment ---".to_string());
        for (sentiment, count) in &self.sentiment_counts {
            lines.push(format!(
                "{}: {} ({:.1}%)",
                sentiment,
                count,
                self.percent(*count)
            ));
        }

        lines.push(String::new());
        lines.push("--- Priority ---".to_string());
        for (priority, count) in &self.priority_counts {
            lines.push(format!(
                "{}: {} ({:.1}%)",
                priority,
                count,
                self.percent(*count)
            ));
        }

        if !self.high_priority_issues.is_empty() {
            lines.push(String::new());
            lines.push("--- Top High-Priority Issues ---".to_string());
            for (category, summary) in &self.high_priority_issues {
                lines.push(format!(
                    "[{}] {}",
                    category,
                    truncate_chars(summary, SUMMARY_WIDTH)
                ));
            }
        }

        lines.push(String::new());
        lines.push("--- Rating Distribution ---".to_string());
        for rating in (1..=5u8).rev() {
            let count = self.rating_counts[(rating - 1) as usize];
            let pct = self.percent(count);
            let bar = "\u{2588}".repeat((pct / 2.0) as usize);
            lines.push(format!("{} star: {} {:.1}%", rating, bar, pct));
        }

        lines.join("\n")
    }

    fn percent(&self, count: usize) -> f64 {
        count as f64 / self.total as f64 * 100.0
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
