pub mod source;
pub mod client;
pub mod pager;

pub use source::ReviewSource;
pub use client::PlayStoreClient;
pub use pager::{PageFetcher, ReviewPager};
