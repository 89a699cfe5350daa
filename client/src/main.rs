use std::path::PathBuf;

use anyhow::Context;
use baskex_core::interface::{load_barter_data, save_barter_data};
use clap::{Parser, Subcommand, ValueHint};

mod scenario;
use scenario::Scenario;

/// Default path to the bundled example scenario.
const SCENARIO_TEMPLATE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../templates/scenario.json");

#[derive(Parser, Debug)]
#[command(name = "baskex", about = "Drive a barter engine through a JSON scenario")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a scenario against an in-memory engine and mock gateway
    Run {
        /// Path to the scenario JSON file
        #[arg(default_value = SCENARIO_TEMPLATE_PATH, value_hint = ValueHint::FilePath)]
        scenario: PathBuf,
    },
    /// Write a starter scenario to the given path
    Init {
        #[arg(default_value = "./scenario.json", value_hint = ValueHint::FilePath)]
        outfile: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing. In order to view logs, run `RUST_LOG=info cargo run`
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario } => {
            let scenario: Scenario =
                load_barter_data(&scenario).context("reading scenario file")?;
            scenario::run(scenario)
        }
        Commands::Init { outfile } => {
            save_barter_data(&outfile, &scenario::template()?)?;
            tracing::info!(path = %outfile.display(), "starter scenario written");
            Ok(())
        }
    }
}
