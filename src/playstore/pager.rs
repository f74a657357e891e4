use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::classify::{Sleeper, TokioSleeper};
use crate::error::Result;
use crate::models::RawReview;
use crate::playstore::client::ReviewPage;

// Most reviews the batchexecute endpoint hands out per request.
const MAX_PAGE_SIZE: u32 = 200;

// One continuation step against the review endpoint.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, count: u32, token: Option<&str>) -> Result<ReviewPage>;
}

// Walks pages until enough reviews are collected, the store stops handing
// out continuation tokens, or a page comes back empty.
pub struct ReviewPager<'a> {
    fetcher: &'a dyn PageFetcher,
    sleeper: Arc<dyn Sleeper>,
    page_size: u32,
    page_delay: Duration,
}

impl<'a> ReviewPager<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, page_size: u32, page_delay: Duration) -> Self {
        Self::with_sleeper(fetcher, page_size, page_delay, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        fetcher: &'a dyn PageFetcher,
        page_size: u32,
        page_delay: Duration,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            fetcher,
            sleeper,
            page_size,
            page_delay,
        }
    }

    pub async fn fetch_limited(&self, max_items: u32) -> Result<Vec<RawReview>> {
        let mut all_reviews: Vec<RawReview> = Vec::new();
        let mut token: Option<String> = None;
        let page_size = self.page_size.min(MAX_PAGE_SIZE);

        loop {
            let remaining = max_items as usize - all_reviews.len();
            let count = remaining.min(page_size as usize) as u32;

            let page = self.fetcher.fetch_page(count, token.as_deref()).await?;
            let fetched = page.reviews.len();
            all_reviews.extend(page.reviews);
            token = page.continuation;

            tracing::info!("Fetched {} reviews ({} total)", fetched, all_reviews.len());

            if all_reviews.len() >= max_items as usize || token.is_none() || fetched == 0 {
                break;
            }

            self.sleeper.sleep(self.page_delay).await;
        }

        all_reviews.truncate(max_items as usize);
        Ok(all_reviews)
    }
}
