use crate::error::CliError;
use std::fs;

/// Loads seed URLs from `path`, one per line.
///
/// Each line is trimmed of leading/trailing ASCII spaces only (matching the
/// source's `trim`, which strips `' '` specifically, not all whitespace),
/// so a blank or all-space line becomes an empty-string seed rather than
/// being dropped. Returns `SeedsEmpty` if the file has no lines at all.
pub fn load_seeds(path: &str) -> Result<Vec<String>, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::SeedsUnreadable {
        path: path.to_string(),
        source,
    })?;

    let seeds: Vec<String> = contents
        .lines()
        .map(|line| line.trim_matches(' ').to_string())
        .collect();

    if seeds.is_empty() {
        return Err(CliError::SeedsEmpty { path: path.to_string() });
    }

    Ok(seeds)
}
