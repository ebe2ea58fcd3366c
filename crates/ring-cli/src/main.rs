use clap::Parser;
use colored::*;
use std::process;

use ring_cli::{execute, print_outcome, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let outcome = match execute(&cli).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_configuration() {
                tracing::debug!("Aborted before any node started");
            }
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = print_outcome(&mut stdout, &outcome, cli.format) {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    if quiet {
        return; // No logging in quiet mode
    }

    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
