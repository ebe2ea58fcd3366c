use colored::*;
use ring_election::{simulate, ElectionOutcome, NullRenderer};
use std::io::Write;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;
use crate::renderer::{paint_role, TableRenderer};

/// Assigns ids and runs one election as the command line asks.
///
/// Id and configuration problems surface here before any node is spawned.
pub async fn execute(cli: &Cli) -> Result<ElectionOutcome, CliError> {
    let config = cli.election_config()?;
    let ids = cli.mode.id_source().assign(cli.nodes, &config)?;
    tracing::info!("Ring of {} nodes with ids {:?}", ids.len(), ids);

    let outcome = if cli.format == OutputFormat::Table && !cli.quiet {
        simulate(ids, &config, &mut TableRenderer::new()).await?
    } else {
        simulate(ids, &config, &mut NullRenderer).await?
    };

    Ok(outcome)
}

pub fn print_outcome<W: Write>(
    out: &mut W,
    outcome: &ElectionOutcome,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
        }
        OutputFormat::Table => {
            writeln!(out)?;
            for node in &outcome.nodes {
                writeln!(
                    out,
                    "  node {:>3}  id {:>5}  {}",
                    node.index,
                    node.id,
                    paint_role(node.role)
                )?;
            }
            writeln!(out, "{} {}", "Leader:".green().bold(), summary(outcome))?;
        }
        OutputFormat::Plain => {
            writeln!(out, "Leader: {}", summary(outcome))?;
        }
    }

    Ok(())
}

fn summary(outcome: &ElectionOutcome) -> String {
    format!(
        "node {} (id {}) after {} messages in {} rounds",
        outcome.leader_index, outcome.leader_id, outcome.total_messages, outcome.rounds
    )
}
