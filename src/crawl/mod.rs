//! Background crawl launcher, handle registry and status poller

mod launcher;
mod registry;
mod types;

pub use launcher::{CrawlLauncher, validate_max_urls};
pub use registry::CrawlRegistry;
pub use types::{CrawlHandle, CrawlLaunch, CrawlRequest, CrawlStatus, CrawlStatusReport};
