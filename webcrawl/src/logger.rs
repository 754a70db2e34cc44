/// Installs a leveled, timestamped `fern` dispatcher writing to stderr.
///
/// `crawl-core` never installs a logger of its own; this is the one place
/// in the binary that does, matching the teacher's `setup_logger`.
pub fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .level(log::LevelFilter::Off)
        .level_for("webcrawl", log::LevelFilter::Debug)
        .level_for("crawl_core", log::LevelFilter::Debug)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                {
                    let target = record.target();
                    target.find(':').map_or(target, |pos| &target[..pos])
                },
                message
            ))
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
