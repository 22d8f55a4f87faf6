use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log file name inside the data directory
pub const LOG_FILE: &str = "monthlane.log";
/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "MONTHLANE_LOG";
const DEFAULT_FILTER: &str = "monthlane=info";

/// Send tracing output to `<data_dir>/monthlane.log`. The terminal belongs
/// to the TUI, so nothing is written to stderr.
pub fn init_logging(data_dir: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}
