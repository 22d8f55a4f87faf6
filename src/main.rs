use clap::Parser;
use monthlane::cli::commands::Cli;
use monthlane::cli::logging::init_logging;
use monthlane::io::config_io::ensure_data_dir;

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir();
    let config_path = cli.config_path(&data_dir);

    if let Err(e) = ensure_data_dir(&data_dir) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = init_logging(&data_dir) {
        eprintln!("warning: logging disabled: {}", e);
    }

    tracing::info!(data_dir = %data_dir.display(), "starting");
    if let Err(e) = monthlane::tui::run(&data_dir, &config_path) {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
