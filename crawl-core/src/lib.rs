//! Core pipeline for a breadth-first web crawler: bounded queues, a Bloom
//! filter for dedup, a raw-socket fetcher, an href extractor, and the
//! lifecycle that wires them together.

mod bloom;
mod config;
mod core;
mod error;
mod extractor;
mod fetcher;
mod log_sink;
mod message;
mod queue;

pub use bloom::BloomFilter;
pub use config::Config;
pub use core::{Core, CrawlState};
pub use error::CrawlError;
pub use extractor::{is_valid_url, Extracted, LinkExtractor};
pub use fetcher::{Fetcher, Request, ResponseHandler};
pub use log_sink::EdgeLog;
pub use message::Message;
pub use queue::BoundedQueue;
