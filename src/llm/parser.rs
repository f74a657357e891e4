use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Classification, Priority, Sentiment, MAX_KEYWORDS};

// The five label fields are mandatory; a missing keywords array is tolerated
// and becomes empty.
#[derive(Deserialize)]
struct ModelClassification {
    category: String,
    subcategory: String,
    sentiment: Sentiment,
    priority: Priority,
    summary: String,
    #[serde(default)]
    keywords: Vec<String>,
}

pub fn parse_classification(raw: &str) -> Result<Classification> {
    // Strip markdown fences first; fall back to scanning for a bare object
    // when the model wrapped the JSON in prose.
    let candidate = strip_fences(raw);
    let json = if candidate.starts_with('{') && candidate.ends_with('}') {
        candidate
    } else {
        balanced_object(raw).ok_or_else(|| {
            Error::ParseError("No JSON object found in model output".to_string())
        })?
    };

    let parsed: ModelClassification = serde_json::from_str(json)
        .map_err(|e| Error::ParseError(format!("Malformed classification: {}", e)))?;

    let mut keywords = parsed.keywords;
    keywords.truncate(MAX_KEYWORDS);

    Ok(Classification {
        category: parsed.category,
        subcategory: parsed.subcategory,
        sentiment: parsed.sentiment,
        priority: parsed.priority,
        summary: parsed.summary,
        keywords,
    })
}

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag line (```json or bare ```)
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.strip_prefix("json").unwrap_or(rest),
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

// First balanced {...} in free text, string literals respected.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
