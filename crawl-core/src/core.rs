use crate::bloom::BloomFilter;
use crate::config::Config;
use crate::extractor::{is_valid_url, LinkExtractor};
use crate::fetcher::{Fetcher, Request};
use crate::log_sink::EdgeLog;
use crate::message::Message;
use crate::queue::BoundedQueue;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// The crawl core's lifecycle state.
///
/// Transitions are monotone: `Ready` -> `Running` -> `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Unavailable,
    Ready,
    Running,
}

/// Owns the three pipeline queues, the fetcher, and the shutdown protocol.
///
/// Spawns the analyze and filter loops as background threads when `run` is
/// called; the request loop runs on the caller's own thread and blocks
/// until the crawl is idle, exhausts its budget, or is shut down.
pub struct Core {
    config: Config,
    seeds: BoundedQueue<Message>,
    candidates: BoundedQueue<Message>,
    resps: BoundedQueue<Message>,
    fetcher: Fetcher,
    state: Arc<Mutex<CrawlState>>,
    output_path: String,
}

impl Core {
    /// Builds a crawl core `Ready` to run, seeded with `seeds`.
    pub fn new(
        seeds: impl IntoIterator<Item = String>,
        output_path: impl Into<String>,
        config: Config,
    ) -> Self {
        let seeds_queue = BoundedQueue::new(config.max_seeds);
        for url in seeds {
            seeds_queue.push(Message::Url(url));
        }

        Core {
            fetcher: Fetcher::new(config.max_threads, config.read_buf, config.port),
            candidates: BoundedQueue::new(config.max_candidates),
            resps: BoundedQueue::new(config.max_resps),
            seeds: seeds_queue,
            state: Arc::new(Mutex::new(CrawlState::Ready)),
            output_path: output_path.into(),
            config,
        }
    }

    pub fn state(&self) -> CrawlState {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Starts the crawl. Returns `false` without doing anything if the
    /// core isn't `Ready` (e.g. it has already run, or was shut down).
    /// Blocks until the request loop exits.
    pub fn run(&self) -> bool {
        {
            let mut state = self.state.lock().expect("state mutex poisoned");
            if *state != CrawlState::Ready {
                return false;
            }
            *state = CrawlState::Running;
        }
        log::info!("crawl started");

        let analyze = {
            let resps = self.resps.clone();
            let candidates = self.candidates.clone();
            let output_path = self.output_path.clone();
            let timeout_push = self.config.timeout_push;
            let analyze_threads = self.config.analyze_threads;
            thread::spawn(move || analyze_loop(resps, candidates, output_path, timeout_push, analyze_threads))
        };

        let filter = {
            let candidates = self.candidates.clone();
            let seeds = self.seeds.clone();
            let bf_m = self.config.bf_m;
            let bf_n = self.config.bf_n;
            let timeout_push = self.config.timeout_push;
            thread::spawn(move || filter_loop(candidates, seeds, bf_m, bf_n, timeout_push))
        };

        self.request_loop();

        let _ = analyze.join();
        let _ = filter.join();

        log::info!("crawl finished");
        true
    }

    /// Moves the core to `Unavailable`, clears every queue, then enqueues
    /// `Stop` into each so every blocked stage wakes within one pop cycle.
    /// Idempotent once `Unavailable`.
    pub fn shutdown(&self) {
        {
            let mut state = self.state.lock().expect("state mutex poisoned");
            if *state != CrawlState::Running {
                return;
            }
            *state = CrawlState::Unavailable;
        }

        log::info!("crawl shutdown initiated");

        self.seeds.clear();
        self.candidates.clear();
        self.resps.clear();

        self.seeds.push(Message::Stop);
        self.candidates.push(Message::Stop);
        self.resps.push(Message::Stop);
    }

    fn request_loop(&self) {
        let mut count: u64 = 0;

        loop {
            let msg = match self.seeds.pop_for(self.config.timeout_idle) {
                Some(msg) => msg,
                None => {
                    log::info!("seeds queue idle for {:?}, shutting down", self.config.timeout_idle);
                    self.shutdown();
                    break;
                }
            };

            match msg {
                Message::Stop => break,
                Message::Url(url) => {
                    let resps = self.resps.clone();
                    let timeout_push = self.config.timeout_push;
                    let request_url = url.clone();

                    let mut request = Request::new(&url);
                    request.add_handler(Box::new(move |body| {
                        let message = Message::HttpResponse {
                            request_url: request_url.clone(),
                            body,
                        };
                        if !resps.push_for(message, timeout_push) {
                            log::error!("responses queue is too small, dropping response for '{request_url}'");
                        }
                    }));

                    self.fetcher.commit(request);
                    count += 1;

                    if count > self.config.max_total_seeds {
                        log::info!("dispatch budget of {} exhausted, shutting down", self.config.max_total_seeds);
                        self.shutdown();
                        break;
                    }
                }
                Message::HttpResponse { .. } => {
                    log::debug!("unreachable: HttpResponse message on seeds queue");
                }
            }
        }
    }
}

fn analyze_loop(
    resps: BoundedQueue<Message>,
    candidates: BoundedQueue<Message>,
    output_path: String,
    timeout_push: Duration,
    analyze_threads: Option<usize>,
) {
    let log_sink = match EdgeLog::open(&output_path) {
        Ok(sink) => Arc::new(sink),
        Err(why) => {
            log::error!("analyze loop could not open edge log: {why}");
            return;
        }
    };

    let run_tasks = |scope: &rayon::Scope| loop {
        match resps.pop() {
            Message::Stop => break,
            Message::HttpResponse { request_url, body } => {
                let candidates = candidates.clone();
                let log_sink = log_sink.clone();
                scope.spawn(move |_| analyze_task(&request_url, &body, &candidates, &log_sink, timeout_push));
            }
            Message::Url(_) => log::debug!("unreachable: Url message on responses queue"),
        }
    };

    match analyze_threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("failed to build analyze thread pool");
            pool.in_place_scope(run_tasks);
        }
        None => rayon::in_place_scope(run_tasks),
    }
}

fn analyze_task(
    request_url: &str,
    body: &str,
    candidates: &BoundedQueue<Message>,
    log_sink: &EdgeLog,
    timeout_push: Duration,
) {
    let host_name = match request_url.find('/') {
        Some(idx) => &request_url[..idx],
        None => request_url,
    };

    LinkExtractor::resolve(body, host_name, |extracted| {
        let trimmed = extracted.url.trim();
        if !is_valid_url(trimmed) {
            return;
        }

        if !candidates.push_for(Message::Url(trimmed.to_string()), timeout_push) {
            log::error!("candidates queue is too small, dropping '{trimmed}'");
            return;
        }

        log_sink.write_edge(request_url, trimmed);
    });
}

fn filter_loop(
    candidates: BoundedQueue<Message>,
    seeds: BoundedQueue<Message>,
    bf_m: usize,
    bf_n: usize,
    timeout_push: Duration,
) {
    let mut filter = BloomFilter::new(bf_m, bf_n);

    loop {
        match candidates.pop() {
            Message::Stop => break,
            Message::Url(url) => {
                if filter.test(&url) && !seeds.push_for(Message::Url(url.clone()), timeout_push) {
                    log::error!("seeds queue is too small, dropping accepted url '{url}'");
                }
            }
            Message::HttpResponse { .. } => log::debug!("unreachable: HttpResponse message on candidates queue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(response: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        port
    }

    fn read_log(path: &str) -> String {
        let mut contents = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[test]
    fn shutdown_before_running_is_a_no_op() {
        let path = temp_log_path("noop");
        let core = Core::new(vec!["127.0.0.1/".to_string()], path.clone(), Config::for_tests(0));
        core.shutdown();
        assert_eq!(core.state(), CrawlState::Ready);
    }

    #[test]
    fn shutdown_twice_is_idempotent() {
        let path = temp_log_path("idempotent");
        let core = Core::new(Vec::<String>::new(), path.clone(), Config::for_tests(0));
        {
            let mut state = core.state.lock().unwrap();
            *state = CrawlState::Running;
        }
        core.shutdown();
        assert_eq!(core.state(), CrawlState::Unavailable);
        core.shutdown();
        assert_eq!(core.state(), CrawlState::Unavailable);
    }

    #[test]
    fn single_seed_one_link_is_logged_and_queued() {
        let port = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 32\r\n\r\n<a href=\"/page\">x</a>");
        let host = "127.0.0.1/".to_string();
        let path = temp_log_path("single-seed");

        let core = Core::new(vec![host.clone()], path.clone(), Config::for_tests(port));
        core.run();

        let contents = read_log(&path);
        let expected = format!("{host}\t127.0.0.1/page\n");
        assert_eq!(contents, expected);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_200_response_produces_no_log_line() {
        let port = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        let host = "127.0.0.1/".to_string();
        let path = temp_log_path("non-200");

        let core = Core::new(vec![host], path.clone(), Config::for_tests(port));
        core.run();

        assert_eq!(read_log(&path), "");
        std::fs::remove_file(&path).unwrap();
    }

    fn temp_log_path(label: &str) -> String {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("crawl-core-test-{label}-{:?}.txt", thread::current().id()));
        let _ = std::fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }
}
