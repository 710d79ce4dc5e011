use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Maps `-v` occurrences and `--quiet` to the log level shared by all outputs.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Composes the level filter, the compact stderr output and the optional log file.
///
/// The file output drops ANSI colors and records thread ids, which identify the
/// rayon workers scoring individual pathways.
fn build_subscriber(level: LevelFilter, log_file: Option<File>) -> impl Subscriber + Send + Sync {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(level)
        .with(stderr_layer)
        .with(file_layer)
}

/// Installs the global subscriber for the process.
///
/// # Errors
///
/// [`CliError::Io`] if the log file cannot be created, [`CliError::Other`] if a global
/// subscriber is already installed.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file.map(File::create).transpose()?;
    build_subscriber(level_filter(verbosity, quiet), file)
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn global_logger_installs_once() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!(pathway = "p1", "This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");

        let again = setup_logging(0, false, None);
        assert!(matches!(again, Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn log_file_respects_level_and_records_thread_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("sspt.log");
        let file = File::create(&log_path).unwrap();

        let subscriber = build_subscriber(level_filter(1, false), Some(file));
        tracing::subscriber::with_default(subscriber, || {
            info!(pathway = "apoptosis", "Pathway scored.");
            debug!("Hidden below the configured level.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Pathway scored."));
        assert!(content.contains("apoptosis"));
        assert!(content.contains("INFO"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Hidden below"));
        assert!(!content.contains("\u{1b}["));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(temp_dir.path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
