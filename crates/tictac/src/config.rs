//! Game configuration loaded from TOML and overridden by CLI flags.

use crate::cli::Cli;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tictac_core::Mark;

/// Config file read when `--config` is not given, if present.
pub const DEFAULT_CONFIG_PATH: &str = "tictac.toml";

/// Who opens the game in single-player mode.
///
/// X always moves first, so this decides which mark the computer gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    /// The human plays X.
    #[default]
    Human,
    /// The computer plays X.
    Computer,
}

impl FirstPlayer {
    /// Mark played by the computer.
    pub fn computer_mark(self) -> Mark {
        match self {
            Self::Human => Mark::O,
            Self::Computer => Mark::X,
        }
    }
}

/// Effective game settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Play against the computer.
    #[serde(default = "default_single_player")]
    single_player: bool,

    /// Who moves first against the computer.
    #[serde(default)]
    first_player: FirstPlayer,

    /// Computer's pause before moving, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Fixed seed for the computer's choices; random when unset.
    #[serde(default)]
    seed: Option<u64>,

    /// Log destination.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_single_player() -> bool {
    true
}

fn default_think_delay_ms() -> u64 {
    500
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictac.log")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            single_player: default_single_player(),
            first_player: FirstPlayer::default(),
            think_delay_ms: default_think_delay_ms(),
            seed: None,
            log_file: default_log_file(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// File that [`GameConfig::load`] reads: `path`, else
    /// [`DEFAULT_CONFIG_PATH`] if it exists, else none.
    pub fn source(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            }
        }
    }

    /// Loads the file named by [`GameConfig::source`], or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::source(path) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line flags on top of file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if cli.two_player {
            self.single_player = false;
        }
        if cli.computer_first {
            self.single_player = true;
            self.first_player = FirstPlayer::Computer;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(delay_ms) = cli.delay_ms {
            self.think_delay_ms = delay_ms;
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        self
    }

    /// Mark played by the computer, `None` in two-player mode.
    pub fn opponent(&self) -> Option<Mark> {
        self.single_player.then(|| self.first_player.computer_mark())
    }

    /// Computer's pause before moving.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = GameConfig::from_file(file.path()).expect("valid config");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.opponent(), Some(Mark::O));
        assert_eq!(config.think_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_file_values_parsed() {
        let file = write_config(
            r#"
single_player = true
first_player = "computer"
think_delay_ms = 50
seed = 9
log_file = "/tmp/game.log"
"#,
        );
        let config = GameConfig::from_file(file.path()).expect("valid config");
        assert_eq!(config.opponent(), Some(Mark::X));
        assert_eq!(*config.think_delay_ms(), 50);
        assert_eq!(*config.seed(), Some(9));
        assert_eq!(config.log_file(), &PathBuf::from("/tmp/game.log"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config("think_delay_ms = 50\nseed = 9\n");
        let cli = Cli {
            two_player: true,
            seed: Some(1),
            delay_ms: Some(0),
            ..Cli::default()
        };
        let config = GameConfig::from_file(file.path())
            .expect("valid config")
            .with_overrides(&cli);
        assert_eq!(config.opponent(), None);
        assert_eq!(*config.seed(), Some(1));
        assert_eq!(config.think_delay(), Duration::ZERO);
    }

    #[test]
    fn test_computer_first_enables_single_player() {
        let file = write_config("single_player = false\n");
        let cli = Cli {
            computer_first: true,
            ..Cli::default()
        };
        let config = GameConfig::from_file(file.path())
            .expect("valid config")
            .with_overrides(&cli);
        assert_eq!(config.opponent(), Some(Mark::X));
    }

    #[test]
    fn test_bad_toml_reports_error() {
        let file = write_config("think_delay_ms = \"soon\"");
        let err = GameConfig::from_file(file.path()).expect_err("type mismatch");
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_explicit_path_is_source() {
        let file = write_config("seed = 3");
        let source = GameConfig::source(Some(file.path()));
        assert_eq!(source.as_deref(), Some(file.path()));
        let config = GameConfig::load(source.as_deref()).expect("valid config");
        assert_eq!(*config.seed(), Some(3));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.toml");
        assert!(GameConfig::load(Some(&missing)).is_err());
    }
}
