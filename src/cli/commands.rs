use std::path::PathBuf;

use clap::Parser;

use crate::io::config_io::{CONFIG_FILE, default_data_dir};

#[derive(Parser, Debug)]
#[command(name = "ml", about = concat!("monthlane v", env!("CARGO_PKG_VERSION"), " - activities laid out month by month"), version)]
pub struct Cli {
    /// Directory holding the store, config, lock and log files
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to config.toml in the data directory)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn config_path(&self, data_dir: &std::path::Path) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_defaults_into_data_dir() {
        let cli = Cli::try_parse_from(["ml", "--data-dir", "/tmp/lanes"]).unwrap();
        let dir = cli.data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/lanes"));
        assert_eq!(cli.config_path(&dir), PathBuf::from("/tmp/lanes/config.toml"));
    }

    #[test]
    fn explicit_config_wins() {
        let cli = Cli::try_parse_from(["ml", "-c", "/etc/ml.toml"]).unwrap();
        assert_eq!(
            cli.config_path(&PathBuf::from("/data")),
            PathBuf::from("/etc/ml.toml")
        );
    }

    #[test]
    fn subcommands_are_rejected() {
        assert!(Cli::try_parse_from(["ml", "add", "piano"]).is_err());
    }
}
