use clap::Parser;

/// `webcrawl <seeds_file> <out_file>`
///
/// Parsed with `try_parse` rather than `parse`: clap's own default error
/// path exits with status 2 on a missing positional, but the source's
/// wrong-argument-count case exits `1`. `main` maps a parse failure to
/// that status itself instead of letting clap exit on its own.
#[derive(Debug, Parser)]
#[command(name = "webcrawl", about = "Breadth-first crawl over a bounded, blocking pipeline")]
pub struct Cli {
    /// Path to a newline-delimited file of seed URLs.
    pub seeds_file: String,
    /// Path the raw `source<TAB>dest` edge log is written to.
    pub out_file: String,
}
