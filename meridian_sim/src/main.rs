// meridian_sim/src/main.rs

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meridian_sim::cli::Cli;
use meridian_sim::config::load_scenario;
use meridian_sim::error::SimError;
use meridian_sim::scenario::run_scenario;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SimError> {
    let mut config = load_scenario(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        config.simulation.seed = seed;
    }

    let result = run_scenario(&config)?;
    let json = serde_json::to_string_pretty(&result)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "wrote episode result");
        }
        None => println!("{json}"),
    }
    Ok(())
}
