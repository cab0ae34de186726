//! Interactive session.
//!
//! Reads one command per line from stdin while a background task credits
//! regenerated energy every poll interval. Both share the engine through an
//! [`Arc`]; the engine serializes their updates.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::commands::{self, Engine};
use crate::error::CliError;

const HELP: &str = "Commands: explore (e), status (s), collection (c), missions (m), help (h), quit (q)";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Explore once.
    Explore,
    /// Show status.
    Status,
    /// Show the collection.
    Collection,
    /// Show missions.
    Missions,
    /// Show the command list.
    Help,
    /// Leave the session.
    Quit,
    /// Blank line.
    Nothing,
    /// Anything else.
    Unknown,
}

/// Parse one input line.
pub fn parse_action(line: &str) -> Action {
    match line.trim().to_lowercase().as_str() {
        "" => Action::Nothing,
        "e" | "explore" => Action::Explore,
        "s" | "status" => Action::Status,
        "c" | "collection" => Action::Collection,
        "m" | "missions" => Action::Missions,
        "h" | "help" | "?" => Action::Help,
        "q" | "quit" | "exit" => Action::Quit,
        _ => Action::Unknown,
    }
}

/// Credit regenerated energy every `period` until aborted.
async fn refill_loop(engine: Arc<Engine>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let outcome = engine.refill_energy();
        if outcome.granted > 0 {
            info!(
                granted = outcome.granted,
                energy = engine.progress().energy,
                "energy regenerated"
            );
        }
    }
}

fn prompt() -> Result<(), CliError> {
    let mut out = std::io::stdout();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Run the session until `quit` or end of input.
pub async fn run(engine: Arc<Engine>, poll_interval: Duration) -> Result<(), CliError> {
    let ticker = tokio::spawn(refill_loop(Arc::clone(&engine), poll_interval));
    info!(poll_secs = poll_interval.as_secs(), "interactive session started");

    println!("{HELP}");
    println!("{}", commands::status(&engine, false)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_action(&line) {
            Action::Explore => {
                println!("Exploring...");
                commands::explore(&engine, 1, false).await?
            }
            Action::Status => commands::status(&engine, false)?,
            Action::Collection => commands::collection(&engine, None, None, false)?,
            Action::Missions => commands::missions(&engine, false)?,
            Action::Help => HELP.to_owned(),
            Action::Quit => break,
            Action::Nothing => continue,
            Action::Unknown => format!("Unknown command {:?}. {HELP}", line.trim()),
        };
        println!("{output}");
    }

    ticker.abort();
    if let Err(e) = engine.save_progress().await {
        warn!(error = %e, "could not save on exit");
    }
    info!("interactive session ended");
    Ok(())
}
