use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use crate::{config::Config, error::Error, logging::Logging};

/// The command line interface for the user content panel.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a configuration file
    pub config: Option<PathBuf>,

    /// Use this backend instead of the one in the configuration
    #[arg(long)]
    pub base_url: Option<String>,

    /// Also write logs to daily rolling files in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The configuration the command line asks for.
    /// The file given (or the default), with any overrides applied.
    pub fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::new_from_path(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }

        config.validate()?;

        Ok(config)
    }

    /// The logging the command line asks for, given where stdout logs should go (if anywhere).
    pub fn logging(&self, stdout: Option<Level>) -> Logging {
        let logging = Logging {
            stdout,
            file: None,
        };

        match &self.log_dir {
            Some(dir) => logging.with_file(Level::DEBUG, dir.clone()),
            None => logging,
        }
    }
}

/// Commands available in the command line interface.
#[derive(Subcommand)]
pub enum Commands {
    /// Examples for user convenience.
    #[clap(subcommand)]
    Examples(Examples),
}

/// Helpful examples for users.
#[derive(Subcommand, Clone)]
pub enum Examples {
    /// Show an example of a configuration file's contents.
    Config,
}

/// Run a command which does not need a panel.
pub fn handle_command(command: Commands) {
    match command {
        Commands::Examples(example) => match example {
            Examples::Config => println!("{}", Config::example().serialize_pretty()),
        },
    }
}
