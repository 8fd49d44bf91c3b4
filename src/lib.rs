#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod filter;
pub mod reddit;
pub mod sanitize;
pub mod scrape;
pub mod subreddit;
pub mod token;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;
pub use filter::ImagePost;
pub use scrape::Scraper;
