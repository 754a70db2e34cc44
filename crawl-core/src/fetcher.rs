use crossbeam_channel::{bounded, Sender};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;

/// A handler invoked with a fetched response's body once it arrives.
///
/// Only invoked for responses whose status line begins `HTTP/?.? 200`;
/// every other outcome (non-200 status, DNS failure, connect/read error)
/// is logged and the request dropped without ever calling a handler.
pub type ResponseHandler = Box<dyn FnOnce(String) + Send>;

/// A pending HTTP request: where to send it, and what to do with the body
/// once it arrives.
pub struct Request {
    host: String,
    path: String,
    handlers: Vec<ResponseHandler>,
}

impl Request {
    /// Builds a request from a seed-style URL: everything up to the first
    /// `/` is the host, the rest (defaulting to `/`) is the path.
    pub fn new(url: &str) -> Self {
        let (host, path) = match url.find('/') {
            Some(idx) => (&url[..idx], &url[idx..]),
            None => (url, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        Request {
            host: host.to_string(),
            path: path.to_string(),
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: ResponseHandler) {
        self.handlers.push(handler);
    }
}

/// A bounded pool of blocking HTTP/1.1-over-cleartext workers.
///
/// Each committed request is handed to a worker thread, which performs DNS
/// resolution, TCP connect, the GET write, and the read loop itself —
/// blocking, in sequence, on that worker's own thread. Bounding the pool to
/// `MAX_THREADS` workers is the concurrency contract the source's shared
/// async I/O service provided; a fixed worker count gives the same bound
/// without needing an event loop.
pub struct Fetcher {
    tx: Sender<Request>,
}

impl Fetcher {
    /// `port` is always `80` in production (the spec's cleartext-only
    /// fetcher); it's a parameter rather than a hardcoded constant so
    /// tests can point the pool at a loopback `TcpListener` bound to an
    /// ephemeral port instead of real DNS-resolvable hosts.
    pub fn new(threads: usize, read_buf: usize, port: u16) -> Self {
        let threads = threads.max(1);
        let (tx, rx) = bounded::<Request>(threads * 4);

        for _ in 0..threads {
            let rx = rx.clone();
            thread::spawn(move || {
                for request in rx {
                    service(request, read_buf, port);
                }
            });
        }

        Fetcher { tx }
    }

    /// Submits `request`; returns immediately. Delivery to its handlers
    /// happens asynchronously, on whichever worker services it.
    pub fn commit(&self, request: Request) {
        let _ = self.tx.send(request);
    }
}

/// The byte-identical GET request the spec requires: no other headers.
fn get_request(host: &str, path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHOST: {host}\r\nConnection: close\r\n\r\n")
}

fn service(request: Request, read_buf: usize, port: u16) {
    let Request { host, path, handlers } = request;

    let addr = format!("{host}:{port}");
    let endpoint = match addr.to_socket_addrs() {
        Ok(mut endpoints) => match endpoints.next() {
            Some(endpoint) => endpoint,
            None => {
                log::warn!("no DNS endpoints for '{host}', dropping request");
                return;
            }
        },
        Err(why) => {
            log::warn!("DNS resolution failed for '{host}': {why}");
            return;
        }
    };

    // Connect once, to the first resolved endpoint. The source started a
    // connect on every endpoint but reused the first one's address for
    // each attempt -- almost certainly a bug. This connects exactly once.
    let mut stream = match TcpStream::connect(endpoint) {
        Ok(stream) => stream,
        Err(why) => {
            log::warn!("connect to '{host}' failed: {why}");
            return;
        }
    };

    let request_bytes = get_request(&host, &path);
    if let Err(why) = stream.write_all(request_bytes.as_bytes()) {
        log::warn!("write to '{host}' failed: {why}");
        return;
    }

    let mut response = String::new();
    let mut buf = vec![0u8; read_buf];

    loop {
        match stream.read(&mut buf) {
            Ok(0) => break, // EOF: successful end-of-response.
            Ok(n) => response.push_str(&String::from_utf8_lossy(&buf[..n])),
            Err(why) => {
                log::warn!("read from '{host}' failed: {why}");
                return;
            }
        }
    }

    if !is_ok_status(&response) {
        log::debug!("dropping non-200 response from '{host}{path}'");
        return;
    }

    for handler in handlers {
        handler(response.clone());
    }
}

/// `true` iff the response's status line begins `HTTP/?.? 200`, i.e. bytes
/// 9..12 read `"200"` (`"HTTP/1.1 "` is exactly 9 bytes).
fn is_ok_status(response: &str) -> bool {
    response.get(9..12) == Some("200")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_splits_host_and_path() {
        let req = Request::new("host.test/a/b");
        assert_eq!(req.host, "host.test");
        assert_eq!(req.path, "/a/b");
    }

    #[test]
    fn request_without_slash_defaults_to_root_path() {
        let req = Request::new("host.test");
        assert_eq!(req.host, "host.test");
        assert_eq!(req.path, "/");
    }

    #[test]
    fn get_request_matches_wire_format_exactly() {
        assert_eq!(
            get_request("host.test", "/page"),
            "GET /page HTTP/1.1\r\nHOST: host.test\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn ok_status_detection() {
        assert!(is_ok_status("HTTP/1.1 200 OK\r\n\r\n"));
        assert!(!is_ok_status("HTTP/1.1 404 Not Found\r\n\r\n"));
        assert!(!is_ok_status("short"));
    }

    #[test]
    fn service_fetches_from_a_loopback_listener_on_a_configured_port() {
        use std::net::TcpListener;
        use std::sync::mpsc;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok");
            }
        });

        let (tx, rx) = mpsc::channel();
        let mut request = Request::new("127.0.0.1/");
        request.add_handler(Box::new(move |body| {
            tx.send(body).unwrap();
        }));

        service(request, 2048, port);
        let body = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(body, "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok");
    }
}
