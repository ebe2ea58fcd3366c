//! Command-line front end for the ring election simulator

pub mod cli;
pub mod error;
pub mod renderer;
pub mod runner;

pub use cli::{Cli, Mode, OutputFormat};
pub use error::CliError;
pub use renderer::TableRenderer;
pub use runner::{execute, print_outcome};
