use std::io;

/// Failures the crawl pipeline itself can report.
///
/// Everything past startup that the spec calls for logging-and-dropping
/// (saturated queues, bad responses, DNS misses) never reaches here; this is
/// reserved for failures that prevent a crawl from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("failed to open log sink at '{path}': {source}")]
    LogSink { path: String, source: io::Error },
}
