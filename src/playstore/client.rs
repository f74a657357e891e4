use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde_json::{json, Value};

use crate::config::CollectorConfig;
use crate::error::{Error, Result};
use crate::models::RawReview;
use crate::playstore::pager::{PageFetcher, ReviewPager};
use crate::playstore::source::ReviewSource;

const BATCH_EXECUTE_URL: &str = "https://play.google.com/_/PlayStoreUi/data/batchexecute";
const REVIEWS_RPC_ID: &str = "UsvDTd";
const SORT_NEWEST: u8 = 2;

// One page of reviews plus the token that fetches the next one.
#[derive(Debug)]
pub struct ReviewPage {
    pub reviews: Vec<RawReview>,
    pub continuation: Option<String>,
}

// The batchexecute endpoint is undocumented: requests wrap an inner JSON
// payload in an f.req form field, and responses prefix the JSON body with an
// anti-hijacking guard line that has to be cut off before parsing.
pub struct PlayStoreClient {
    client: Client,
    config: CollectorConfig,
}

impl PlayStoreClient {
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("reviewlens/1.0"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PageFetcher for PlayStoreClient {
    async fn fetch_page(&self, count: u32, token: Option<&str>) -> Result<ReviewPage> {
        let url = format!(
            "{}?hl={}&gl={}",
            BATCH_EXECUTE_URL, self.config.language, self.config.country
        );
        let envelope = build_envelope(&self.config.app_id, count, token);

        tracing::debug!("Fetching review page for {}", self.config.app_id);
        let response = self
            .client
            .post(&url)
            .form(&[("f.req", envelope)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::PlayStoreApi(format!(
                "Failed to fetch reviews for {}: {} - {}",
                self.config.app_id, status, body
            )));
        }

        let text = response.text().await?;
        parse_page(&text)
    }
}

#[async_trait]
impl ReviewSource for PlayStoreClient {
    async fn fetch_reviews(&self, max_reviews: u32) -> Result<Vec<RawReview>> {
        let pager = ReviewPager::new(self, self.config.page_size, self.config.page_delay);
        pager.fetch_limited(max_reviews).await
    }

    fn source_id(&self) -> &str {
        &self.config.app_id
    }
}

fn build_envelope(app_id: &str, count: u32, token: Option<&str>) -> String {
    // Fetch window is [count, null, continuation]; the trailing 7 selects the
    // review payload variant.
    let inner = json!([
        null,
        null,
        [2, SORT_NEWEST, [count, null, token], null, []],
        [app_id, 7]
    ]);
    let envelope = json!([[[REVIEWS_RPC_ID, inner.to_string(), null, "generic"]]]);
    envelope.to_string()
}

fn parse_page(text: &str) -> Result<ReviewPage> {
    let start = text
        .find('[')
        .ok_or_else(|| Error::ParseError("Review response contains no JSON payload".to_string()))?;
    let outer: Value = serde_json::from_str(&text[start..])?;

    // The review payload is a JSON document nested as a string inside the
    // envelope.
    let payload = outer
        .get(0)
        .and_then(|v| v.get(2))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::ParseError("Review payload missing from response".to_string()))?;
    let data: Value = serde_json::from_str(payload)?;

    let reviews = data
        .get(0)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(extract_review).collect())
        .unwrap_or_default();

    let continuation = data.as_array().and_then(|arr| {
        // The continuation token rides in the second-to-last element.
        let slot = arr.get(arr.len().checked_sub(2)?)?;
        slot.as_array()?.last()?.as_str().map(String::from)
    });

    Ok(ReviewPage {
        reviews,
        continuation,
    })
}

// Reviews missing an id are skipped; every other field degrades to a default.
fn extract_review(item: &Value) -> Option<RawReview> {
    let review_id = item.get(0)?.as_str()?.to_string();
    let author = item
        .get(1)
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let rating = item
        .get(2)
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .unwrap_or(0);
    let content = item
        .get(4)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let date = item
        .get(5)
        .and_then(|v| v.get(0))
        .and_then(Value::as_i64)
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0));
    let thumbs_up = item
        .get(6)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);
    let reply_content = item
        .get(7)
        .and_then(|v| v.get(1))
        .and_then(Value::as_str)
        .map(String::from);
    let reply_date = item
        .get(7)
        .and_then(|v| v.get(2))
        .and_then(|v| v.get(0))
        .and_then(Value::as_i64)
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0));

    Some(RawReview {
        review_id,
        author,
        rating,
        content,
        date,
        thumbs_up,
        reply_content,
        reply_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_response(payload: Value) -> String {
        let outer = json!([[
            "wrb.fr",
            REVIEWS_RPC_ID,
            payload.to_string(),
            null,
            null,
            null,
            "generic"
        ]]);
        format!(")]}}'\n\n{}", outer)
    }

    #[test]
    fn test_envelope_first_page_has_null_token() {
        let envelope = build_envelope("com.example.app", 150, None);
        assert!(envelope.contains(REVIEWS_RPC_ID));
        assert!(envelope.contains("com.example.app"));
        assert!(envelope.contains("[150,null,null]"));
    }

    #[test]
    fn test_envelope_threads_continuation_token() {
        let envelope = build_envelope("com.example.app", 200, Some("tok-abc"));
        assert!(envelope.contains("tok-abc"));
    }

    #[test]
    fn test_parse_page_extracts_positional_fields() {
        let payload = json!([
            [
                ["r1", ["Alice"], 5, null, "Great app", [1709286600], 12, null],
                [
                    "r2",
                    ["Bob"],
                    1,
                    null,
                    "Crashes on startup",
                    [1709286700],
                    3,
                    [null, "Thanks, fixed in 2.1", [1709290000]]
                ]
            ],
            [null, "TOKEN-NEXT"],
            null
        ]);
        let page = parse_page(&canned_response(payload)).unwrap();

        assert_eq!(page.reviews.len(), 2);
        assert_eq!(page.continuation.as_deref(), Some("TOKEN-NEXT"));

        let first = &page.reviews[0];
        assert_eq!(first.review_id, "r1");
        assert_eq!(first.author, "Alice");
        assert_eq!(first.rating, 5);
        assert_eq!(first.content, "Great app");
        assert_eq!(first.thumbs_up, 12);
        assert!(first.date.is_some());
        assert!(first.reply_content.is_none());

        let second = &page.reviews[1];
        assert_eq!(second.reply_content.as_deref(), Some("Thanks, fixed in 2.1"));
        assert!(second.reply_date.is_some());
    }

    #[test]
    fn test_parse_page_without_token_ends_pagination() {
        let payload = json!([
            [["r1", ["Alice"], 4, null, "Fine", [1709286600], 0, null]],
            [null, null],
            null
        ]);
        let page = parse_page(&canned_response(payload)).unwrap();

        assert_eq!(page.reviews.len(), 1);
        assert!(page.continuation.is_none());
    }

    #[test]
    fn test_parse_page_with_empty_review_list() {
        let payload = json!([null, [null, null], null]);
        let page = parse_page(&canned_response(payload)).unwrap();

        assert!(page.reviews.is_empty());
        assert!(page.continuation.is_none());
    }

    #[test]
    fn test_parse_page_rejects_non_json_body() {
        let err = parse_page("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_reviews_without_id_are_skipped() {
        let payload = json!([
            [
                [null, ["Ghost"], 3, null, "No id", [1709286600], 0, null],
                ["r2", ["Bob"], 2, null, "Still here", [1709286700], 1, null]
            ],
            [null, null],
            null
        ]);
        let page = parse_page(&canned_response(payload)).unwrap();

        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.reviews[0].review_id, "r2");
    }

    #[test]
    fn test_out_of_range_numbers_degrade_to_zero() {
        // 261 would alias to a plausible rating of 5 under a wrapping cast.
        let payload = json!([
            [[
                "r1",
                ["Mallory"],
                261,
                null,
                "Suspicious",
                [1709286600],
                8589934592u64,
                null
            ]],
            [null, null],
            null
        ]);
        let page = parse_page(&canned_response(payload)).unwrap();

        assert_eq!(page.reviews[0].rating, 0);
        assert_eq!(page.reviews[0].thumbs_up, 0);
    }
}
