// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sleeve-Lite CLI - place MEP openings for a JSON scenario.
//!
//! Usage:
//!   sleeve-lite <scenario.json> [--pretty] [--parallel] [--output <file>]
//!
//! Engine settings come from `SLEEVE_*` environment variables, log filtering
//! from `RUST_LOG`.

mod config;
mod scenario;

use anyhow::{Context, Result};
use config::Config;
use scenario::Scenario;
use serde::Serialize;
use sleeve_lite_engine::{
    CommandOutcome, EngineConfig, PlaceOpeningCommand, PlacementEngine, PresetSelection,
};
use std::env;
use std::path::PathBuf;

/// The conduit/host pair a report line was requested for
#[derive(Serialize)]
struct Request {
    conduit: u32,
    host: String,
}

/// One line of the report
#[derive(Serialize)]
struct PlacementResult {
    request: Request,
    #[serde(flatten)]
    outcome: CommandOutcome,
}

#[derive(Serialize)]
struct Report {
    scenario: String,
    placed: usize,
    failed: usize,
    /// Opening instances in the active document after the run
    openings: usize,
    results: Vec<PlacementResult>,
}

#[derive(Debug, PartialEq)]
struct Args {
    scenario: PathBuf,
    pretty: bool,
    parallel: bool,
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,sleeve_lite_engine=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let Some(args) = parse_args(env::args().skip(1), &config)? else {
        print_usage();
        return Ok(());
    };

    let mut engine_config = EngineConfig::from_env();
    if args.parallel {
        engine_config.parallel_intersections = true;
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build_global()
            .context("initialising rayon thread pool")?;
    }
    let engine = PlacementEngine::new(engine_config);

    tracing::info!(
        scenario = %args.scenario.display(),
        parallel = engine.config().parallel_intersections,
        min_depth = engine.config().min_depth,
        "Starting Sleeve-Lite"
    );

    let scenario = Scenario::load(&args.scenario)?;
    let report = run(&scenario, &engine)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Run every placement of a scenario against a fresh project
fn run(scenario: &Scenario, engine: &PlacementEngine) -> Result<Report> {
    let mut project = scenario.build_project()?;
    let command = PlaceOpeningCommand::new(engine);

    let mut results = Vec::with_capacity(scenario.placements.len());
    for placement in &scenario.placements {
        let mut selection = PresetSelection::new(placement.conduit(), placement.host());
        let outcome = command.execute(&mut project, &mut selection);
        tracing::info!(
            conduit = placement.conduit,
            host = %placement.host(),
            "{}",
            outcome.status_message()
        );
        results.push(PlacementResult {
            request: Request {
                conduit: placement.conduit,
                host: placement.host().to_string(),
            },
            outcome,
        });
    }

    let placed = results.iter().filter(|r| r.outcome.is_placed()).count();
    Ok(Report {
        scenario: scenario.name.clone(),
        placed,
        failed: results.len() - placed,
        openings: project.active().instance_count(),
        results,
    })
}

/// `None` when usage should be printed instead of running
fn parse_args(args: impl IntoIterator<Item = String>, config: &Config) -> Result<Option<Args>> {
    let mut scenario = config.scenario_path.clone().map(PathBuf::from);
    let mut pretty = config.pretty;
    let mut parallel = false;
    let mut output = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--pretty" => pretty = true,
            "--parallel" => parallel = true,
            "--output" => {
                let path = args.next().context("--output needs a file path")?;
                output = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => {
                anyhow::bail!("unknown option: {other}");
            }
            path => scenario = Some(PathBuf::from(path)),
        }
    }

    Ok(scenario.map(|scenario| Args {
        scenario,
        pretty,
        parallel,
        output,
    }))
}

fn print_usage() {
    eprintln!("Usage: sleeve-lite <scenario.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --pretty           Pretty-print the JSON report");
    eprintln!("  --parallel         Intersect solid pairs on a thread pool");
    eprintln!("  --output <file>    Write the report to a file instead of stdout");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SLEEVE_MIN_DEPTH_MM, SLEEVE_DEFAULT_DEPTH_MM, SLEEVE_AXIS_THRESHOLD,");
    eprintln!("  SLEEVE_ANGLE_OFFSET_DEG, SLEEVE_VOLUME_EPSILON, SLEEVE_PARALLEL,");
    eprintln!("  SLEEVE_ROUND_FAMILY/TYPE, SLEEVE_RECT_FAMILY/TYPE, WORKER_THREADS, RUST_LOG");
}
