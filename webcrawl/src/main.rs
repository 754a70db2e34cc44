mod cli;
mod error;
mod logger;
mod seeds;

use clap::Parser;
use cli::Cli;
use crawl_core::{Config, Core};
use std::process::exit;

fn main() {
    if let Err(why) = logger::setup_logger() {
        eprintln!("failed to initialize logger: {why}");
    }

    let cli = Cli::try_parse().unwrap_or_else(|_| {
        eprintln!("usage: webcrawl <seeds_file> <out_file>");
        exit(1);
    });

    let loaded = seeds::load_seeds(&cli.seeds_file).unwrap_or_else(|why| {
        log::error!("{why}");
        exit(why.exit_code());
    });

    let core = Core::new(loaded, cli.out_file, Config::default());
    core.run();

    log::info!("crawl complete");
}
