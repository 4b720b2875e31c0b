pub mod batch;
pub mod tweet;
pub mod url;

pub use batch::{BatchResponse, BatchStatus};
pub use tweet::{ExtractionResult, ExtractionStatus, Metrics, TweetFields};
pub use url::{author_handle, is_valid_tweet_url};
