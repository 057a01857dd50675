//! Logging initialization for cmdim.
//!
//! Logs go to stderr so that stdout only carries command output.

use log::LevelFilter;

/// Map the `-v` count to a level filter. Without `-v` only warnings and
/// errors are shown.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize env_logger. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter(Some("cmdim"), level)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}
