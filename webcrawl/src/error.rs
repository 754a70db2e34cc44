use std::io;

/// Startup failures the CLI can hit before the core ever runs.
///
/// Every variant here maps to one of the two documented non-zero exit
/// codes; nothing past `Core::run` raises through this type, since the
/// pipeline itself logs-and-drops rather than aborting the process.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read seeds file '{path}': {source}")]
    SeedsUnreadable { path: String, source: io::Error },
    #[error("seeds file '{path}' contained no usable seeds")]
    SeedsEmpty { path: String },
}

impl CliError {
    /// Process exit status for this failure, matching the source's
    /// `exit(-2)` (seeds), clamped to a valid `u8` exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SeedsUnreadable { .. } | CliError::SeedsEmpty { .. } => 2,
        }
    }
}
