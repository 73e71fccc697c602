//! Command-line interface for tictac.

use clap::Parser;
use std::path::PathBuf;

/// Tic-tac-toe in the terminal, against a friend or a random computer.
#[derive(Parser, Debug, Default)]
#[command(name = "tictac")]
#[command(about = "Terminal tic-tac-toe with an optional random opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Two players on one keyboard, no computer opponent
    #[arg(long, conflicts_with = "computer_first")]
    pub two_player: bool,

    /// Let the computer play X and open the game
    #[arg(long)]
    pub computer_first: bool,

    /// Seed for the computer's move choice
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds the computer waits before moving
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Where to write logs
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from(["tictac", "--seed", "5", "--delay-ms", "0", "--computer-first"])
            .expect("valid args");
        assert_eq!(cli.seed, Some(5));
        assert_eq!(cli.delay_ms, Some(0));
        assert!(cli.computer_first);
        assert!(!cli.two_player);
    }

    #[test]
    fn test_two_player_conflicts_with_computer_first() {
        assert!(Cli::try_parse_from(["tictac", "--two-player", "--computer-first"]).is_err());
    }
}
