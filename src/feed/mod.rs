mod fetcher;

pub use fetcher::{FeedFetcher, FetchFeeds};
