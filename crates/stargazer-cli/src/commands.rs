//! Command handlers shared by one-shot subcommands and the interactive
//! session.
//!
//! Each handler returns the text to print, either rendered for a terminal
//! or as pretty JSON.

use serde::Serialize;
use stargazer_core::{Discovery, ExploreError, ProgressionEngine};
use stargazer_store::FileStore;
use stargazer_types::{DiscoveredObject, ObjectType, Rarity, UserProgress};

use crate::error::CliError;
use crate::render;

/// The engine as the binary runs it: file-backed, wall clock, OS-seeded RNG.
pub type Engine = ProgressionEngine<FileStore>;

/// Status as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    progress: UserProgress,
    can_explore: bool,
    seconds_until_next_refill: Option<i64>,
    catalog_size: usize,
}

/// Result of one exploration attempt as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
enum ExploreOutcome {
    Discovered(Discovery),
    Rejected { reason: String },
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Player status.
pub fn status(engine: &Engine, json: bool) -> Result<String, CliError> {
    let progress = engine.progress();
    let wait = engine.until_next_refill();
    if json {
        return to_json(&StatusView {
            progress,
            can_explore: engine.can_explore(),
            seconds_until_next_refill: wait.map(|w| w.num_seconds()),
            catalog_size: engine.catalog().len(),
        });
    }
    Ok(render::status(&progress, wait, engine.catalog().len()))
}

/// Explore up to `count` times, stopping at the first rejection.
pub async fn explore(engine: &Engine, count: u32, json: bool) -> Result<String, CliError> {
    let mut outcomes = Vec::new();
    for _ in 0..count {
        match engine.explore().await {
            Ok(found) => outcomes.push(ExploreOutcome::Discovered(found)),
            Err(e) => {
                outcomes.push(ExploreOutcome::Rejected {
                    reason: rejection_text(engine, e),
                });
                break;
            }
        }
    }

    if json {
        return to_json(&outcomes);
    }
    Ok(outcomes
        .iter()
        .map(|o| match o {
            ExploreOutcome::Discovered(found) => render::discovery(found),
            ExploreOutcome::Rejected { reason } => reason.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn rejection_text(engine: &Engine, err: ExploreError) -> String {
    render::rejection(err, engine.until_next_refill())
}

/// Discovered objects, optionally filtered.
pub fn collection(
    engine: &Engine,
    object_type: Option<ObjectType>,
    rarity: Option<Rarity>,
    json: bool,
) -> Result<String, CliError> {
    let objects: Vec<DiscoveredObject> = match object_type {
        Some(t) => engine.discovered_by_type(t),
        None => engine.discovered(),
    }
    .into_iter()
    .filter(|o| rarity.is_none_or(|r| o.entry.rarity == r))
    .collect();

    if json {
        return to_json(&objects);
    }

    let counts = engine
        .rarity_counts()
        .into_iter()
        .map(|(r, n)| format!("{r}: {n}"))
        .collect::<Vec<_>>()
        .join("  ");
    Ok(format!("{}\n\n{counts}", render::collection(&objects)))
}

/// Mission progress.
pub fn missions(engine: &Engine, json: bool) -> Result<String, CliError> {
    let statuses = engine.missions();
    if json {
        return to_json(&statuses);
    }
    Ok(render::missions(&statuses))
}
