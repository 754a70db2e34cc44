/// A value moved between pipeline stages.
///
/// A closed tagged union in place of the source's dynamically-downcast
/// message base: stages `match` on the variant instead of recovering a
/// concrete type from a trait object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A URL to fetch, whether a seed or a candidate that passed the
    /// Bloom filter.
    Url(String),
    /// A fetched response: the URL that produced it and the response body
    /// (including its original status line).
    HttpResponse { request_url: String, body: String },
    /// Sentinel that wakes a blocked consumer and tells it to exit.
    Stop,
}

impl Message {
    pub fn url(url: impl Into<String>) -> Self {
        Message::Url(url.into())
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Message::Stop)
    }
}
