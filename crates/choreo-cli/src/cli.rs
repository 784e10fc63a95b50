//! Command-line interface for `choreo`.
//!
//! # Examples
//!
//! ```bash
//! # Print durations and the schedule of a scene
//! choreo scenes/intro.toml
//!
//! # Machine-readable report including the lowered engine tree
//! choreo scenes/intro.toml --format json --engine
//!
//! # Play the scene on a headless layer in 50ms steps
//! choreo scenes/intro.toml --simulate 0.05
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::report::DEFAULT_LIMIT;

/// Inspect declarative animation scenes.
///
/// Loads a scene file (TOML or JSON), builds its animation tree and reports
/// base and accumulated durations together with the absolute schedule of
/// every node.
#[derive(Parser, Debug, Clone)]
#[command(name = "choreo", author, version, about = "Inspect declarative animation scenes")]
pub struct Cli {
    /// Scene file to load (`.toml` or `.json`)
    pub scene: PathBuf,

    /// Output format
    #[arg(long, short = 'f', default_value = "text", env = "CHOREO_FORMAT")]
    pub format: OutputFormat,

    /// Include the lowered engine tree (JSON output only)
    #[arg(long)]
    pub engine: bool,

    /// Play the scene on a headless layer, stepping the clock by this many
    /// seconds, and report when it finishes
    #[arg(long, value_name = "STEP")]
    pub simulate: Option<f64>,

    /// Give up simulating after this many seconds
    #[arg(long, default_value_t = DEFAULT_LIMIT, requires = "simulate")]
    pub limit: f64,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Report formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented human-readable schedule
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter for the verbosity level.
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_defaults() {
        let cli = Cli::try_parse_from(["choreo", "scene.toml"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.engine);
        assert!(cli.simulate.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "choreo", "scene.json", "--format", "json", "--engine", "--simulate", "0.1", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.engine);
        assert_eq!(cli.simulate, Some(0.1));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_limit_requires_simulate() {
        assert!(Cli::try_parse_from(["choreo", "scene.toml", "--limit", "5"]).is_err());
    }
}
