use crate::taxonomy::FeedbackTaxonomy;

// The exact output shape the parser expects; kept next to the builder so the
// required keys stay in sync.
const RESPONSE_FORMAT: &str = r#"{
    "category": "the main category",
    "subcategory": "the specific subcategory",
    "sentiment": "positive/neutral/negative",
    "priority": "high/medium/low (based on severity and impact)",
    "summary": "a short summary of the feedback in at most 2 sentences",
    "keywords": ["keyword 1", "keyword 2", "keyword 3"]
}"#;

pub fn build_classification_prompt(
    content: &str,
    rating: u8,
    taxonomy: &FeedbackTaxonomy,
) -> String {
    format!(
        r#"Analyze the following app store review and classify it in detail:

REVIEW: "{content}"
RATING: {rating}/5

Respond with a single JSON object in exactly this format:
{format}

AVAILABLE CATEGORIES:
{categories}

RULES:
1. Pick the single best-fitting category ({names})
2. Sentiment must be consistent with the rating
3. Priority is high for critical bugs, crashes, or security issues
4. Write the summary in the same language as the review
5. At most 5 relevant keywords

Answer with the JSON only, no additional explanation."#,
        content = content,
        rating = rating,
        format = RESPONSE_FORMAT,
        categories = taxonomy.to_prompt_json(),
        names = taxonomy.category_names().join(", "),
    )
}
