use std::time::Duration;

/// Tunable constants for a crawl run.
///
/// `Config::default()` matches the production values; tests shrink the
/// capacities and timeouts so a suite doesn't spend real minutes waiting
/// on `TIMEOUT_IDLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Capacity of the seeds (frontier) queue.
    pub max_seeds: usize,
    /// Capacity of the candidates queue.
    pub max_candidates: usize,
    /// Capacity of the HTTP responses queue.
    pub max_resps: usize,
    /// Number of fetcher worker threads.
    pub max_threads: usize,
    /// Total URLs the crawler will dispatch to the fetcher in one run.
    pub max_total_seeds: u64,
    /// Bloom filter bit-array size (`M`).
    pub bf_m: usize,
    /// Bloom filter intended insert count (`N`); derives `k`.
    pub bf_n: usize,
    /// How long the request loop waits on an empty seeds queue before
    /// treating the crawl as idle and shutting down.
    pub timeout_idle: Duration,
    /// How long a stage waits pushing into a downstream queue before
    /// giving up and dropping the item.
    pub timeout_push: Duration,
    /// Size of the fetcher's per-read scratch buffer.
    pub read_buf: usize,
    /// TCP port the fetcher connects to. Always `80` in production; tests
    /// override it to point at a loopback `TcpListener` on an ephemeral
    /// port instead of standing up a real HTTP server on port 80.
    pub port: u16,
    /// Worker count for the analyze stage's pool. `None` means "default to
    /// available parallelism" (the global `rayon` pool); `Some(n)` pins it
    /// to `n` threads, which tests use for deterministic, single-threaded
    /// analysis.
    pub analyze_threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_seeds: 1024,
            max_candidates: 4096,
            max_resps: 256,
            max_threads: 32,
            max_total_seeds: 10_000,
            bf_m: 1_600_000,
            bf_n: 110_000,
            timeout_idle: Duration::from_secs(20),
            timeout_push: Duration::from_secs(1),
            read_buf: 2048,
            port: 80,
            analyze_threads: None,
        }
    }
}

#[cfg(test)]
impl Config {
    /// A config sized for fast, deterministic tests: small queues, a single
    /// fetcher thread, millisecond timeouts, and a Bloom filter small enough
    /// to construct instantly while still deriving a sane `k`. `port` should
    /// be a loopback `TcpListener`'s ephemeral port for tests that actually
    /// exercise the fetcher; callers that never connect can pass `0`.
    pub fn for_tests(port: u16) -> Self {
        Config {
            max_seeds: 16,
            max_candidates: 16,
            max_resps: 16,
            max_threads: 2,
            max_total_seeds: 10_000,
            bf_m: 4096,
            bf_n: 256,
            timeout_idle: Duration::from_millis(200),
            timeout_push: Duration::from_millis(200),
            read_buf: 2048,
            port,
            analyze_threads: Some(1),
        }
    }
}
