#![forbid(unsafe_code)]

//! # choreo
//!
//! Loads a scene file, builds its animation tree and reports the computed
//! durations and schedule.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p choreo-cli -- scenes/intro.toml
//! ```

mod cli;
mod report;

use anyhow::Context;
use choreo::Scene;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputFormat};
use report::Report;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let scene = Scene::from_file(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;
    let animation = scene
        .build()
        .with_context(|| format!("failed to build scene {}", cli.scene.display()))?;
    info!(
        scene.name = %scene.name,
        scene.base = %animation.base_duration(),
        scene.accumulated = %animation.accumulated_duration(),
        "Scene built"
    );

    let mut report = Report::new(&scene.name, &animation, cli.engine);
    if let Some(step) = cli.simulate {
        report.simulation = Some(report::simulate(&animation, step, cli.limit));
    }

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
