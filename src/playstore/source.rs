use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawReview;

// The pipeline depends on this trait only, so tests can feed it canned
// reviews without touching the network.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    // Up to max_reviews reviews, newest first.
    async fn fetch_reviews(&self, max_reviews: u32) -> Result<Vec<RawReview>>;

    // Identifier used to name artifacts produced from this source.
    fn source_id(&self) -> &str;
}
