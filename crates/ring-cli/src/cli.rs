use clap::{Parser, Subcommand};
use ring_election::{ElectionConfig, IdSource, Priority};
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "ring-elect",
    about = "Ring leader election simulator",
    version = env!("CARGO_PKG_VERSION"),
    author = "Ring Election Team",
    long_about = "Runs a leader election among N concurrent peers arranged in a directed ring \
                  and shows every node's role and candidate as the election unfolds."
)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,

    /// Number of nodes in the ring
    #[arg(short, long, global = true, default_value_t = 4)]
    pub nodes: usize,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format (table, json, plain)
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Pause between frames in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Seed for random id assignment
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Elect the smallest id instead of the largest
    #[arg(long, global = true)]
    pub lowest: bool,
}

/// How node ids are assigned
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Sample distinct random ids
    Random,

    /// Read ids from a file, one decimal integer per line
    #[command(name = "from_file", alias = "from-file")]
    FromFile {
        /// Path to the id file
        path: PathBuf,
    },
}

impl Mode {
    pub fn id_source(&self) -> IdSource {
        match self {
            Self::Random => IdSource::Random,
            Self::FromFile { path } => IdSource::FromFile(path.clone()),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Plain,
}

impl Cli {
    /// Configuration file values with command-line overrides applied
    pub fn election_config(&self) -> Result<ElectionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => ElectionConfig::from_file(path)?,
            None => ElectionConfig::default(),
        };

        if let Some(delay) = self.delay_ms {
            config.frame_delay_ms = delay;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.lowest {
            config.priority = Priority::Lowest;
        }
        // Frames are only drawn in table mode.
        if self.format != OutputFormat::Table || self.quiet {
            config.frame_delay_ms = 0;
        }

        config.validate()?;
        Ok(config)
    }
}
