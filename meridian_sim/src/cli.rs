// meridian_sim/src/cli.rs

use std::path::PathBuf;

use clap::Parser;

/// Meridian: a deterministic driving-simulation core.
///
/// Runs a single episode described by a scenario TOML file and prints the
/// episode result record as JSON.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/loop_course.toml")]
    pub scenario: PathBuf,

    /// Override the scenario's PRNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the episode result JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
