use crate::error::CrawlError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// An append-only, thread-safe text sink for the raw edge log.
///
/// Guarded by a single mutex; `write_edge` is the only mutating operation,
/// matching the source's threadsafe_ostream (whose `operator<<` was
/// likewise the sole mutator).
pub struct EdgeLog {
    file: Mutex<File>,
}

impl EdgeLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CrawlError::LogSink {
                path: path.display().to_string(),
                source,
            })?;
        Ok(EdgeLog { file: Mutex::new(file) })
    }

    /// Appends `"<request_url>\t<extracted_url>\n"`.
    pub fn write_edge(&self, request_url: &str, extracted_url: &str) {
        let mut file = self.file.lock().expect("edge log mutex poisoned");
        if let Err(why) = writeln!(file, "{request_url}\t{extracted_url}") {
            log::error!("failed to append to edge log: {why}");
        }
    }
}
