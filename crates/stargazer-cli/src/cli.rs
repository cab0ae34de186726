//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stargazer_types::{ObjectType, Rarity};

/// Stargazer: explore the night sky and build a collection.
#[derive(Debug, Parser)]
#[command(name = "stargazer", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "stargazer-config.yaml")]
    pub config: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand (defaults to `status`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show level, experience and energy.
    Status,

    /// Spend energy to discover new objects.
    Explore {
        /// Number of explorations to attempt.
        #[arg(long, short = 'n', default_value_t = 1)]
        count: u32,
    },

    /// List discovered objects.
    Collection {
        /// Only show this object type.
        #[arg(long = "type", short = 't')]
        object_type: Option<ObjectType>,

        /// Only show this rarity tier.
        #[arg(long, short = 'r')]
        rarity: Option<Rarity>,
    },

    /// Show mission progress.
    Missions,

    /// Discard all progress.
    Reset {
        /// Skip the confirmation check.
        #[arg(long)]
        yes: bool,
    },

    /// Interactive session with background energy regeneration.
    Play,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["stargazer"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("stargazer-config.yaml"));
        assert!(!cli.json);
    }

    #[test]
    fn collection_filters_parse() {
        let cli =
            Cli::try_parse_from(["stargazer", "collection", "--type", "black hole", "-r", "epic"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Collection {
                object_type: Some(ObjectType::BlackHole),
                rarity: Some(Rarity::Epic),
            })
        ));
    }

    #[test]
    fn unknown_rarity_is_rejected() {
        assert!(Cli::try_parse_from(["stargazer", "collection", "--rarity", "mythic"]).is_err());
    }

    #[test]
    fn explore_count_and_global_json() {
        let cli = Cli::try_parse_from(["stargazer", "explore", "-n", "3", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Command::Explore { count: 3 })));
    }
}
