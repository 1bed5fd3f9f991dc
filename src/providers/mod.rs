pub mod feed;

pub use feed::{FeedSnapshot, HttpRateSource, RateSource, refresh_rates};
