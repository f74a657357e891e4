use async_trait::async_trait;

use crate::error::Result;

// One transport round trip: review in, raw model text out. Parsing lives in
// the classifier so parse failures can re-enter its retry loop.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    async fn classify(&self, content: &str, rating: u8) -> Result<String>;
    fn name(&self) -> &str;
}
