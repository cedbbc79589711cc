//! Storage housekeeping for the crawl database and scratch exports

mod janitor;

pub use janitor::{DeleteMethod, DeleteOutcome, EntryUsage, StorageJanitor, StorageSummary};
