/*
 * BioCrowds Simulation
 *
 * Agents walk toward their goals by claiming the scattered markers around
 * them and steering toward the claimed markers that point the right way.
 * Crowds avoid each other because a marker belongs to at most one agent.
 *
 * Without --headless this opens an interactive top-down viewer; with it the
 * simulation runs for a fixed number of frames and prints final positions.
 */

use std::process::ExitCode;

use biocrowds::app::{self, ViewerOptions};
use biocrowds::{logging, Scenario, SimulationParams, SimulationRun};
use clap::Parser;
use log::{error, info};

// Fixed frame time for headless runs
const HEADLESS_DELTA: f32 = 1.0 / 60.0;

/// Marker-claiming crowd simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to start with: 1, 2, 3 or opposing-lines, alternating-lines, circle
    #[arg(short, long, default_value = "1")]
    scenario: Scenario,

    /// Number of agents to spawn
    #[arg(short, long)]
    agents: Option<usize>,

    /// Marker samples per unit of grid width
    #[arg(long)]
    density: Option<f32>,

    /// Seed for marker scattering
    #[arg(long)]
    seed: Option<u64>,

    /// Process agents in parallel
    #[arg(long)]
    parallel: bool,

    /// Clear marker claims at the start of every frame
    #[arg(long)]
    reset_claims: bool,

    /// Run this many frames without a window and print final positions
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn params(&self) -> SimulationParams {
        let mut params = SimulationParams::default();
        if let Some(agents) = self.agents {
            params.num_agents = agents;
        }
        if let Some(density) = self.density {
            params.sample_density = density;
        }
        params.seed = self.seed;
        params.enable_parallel = self.parallel;
        params.reset_claims_each_frame = self.reset_claims;
        params
    }
}

fn run_headless(params: SimulationParams, scenario: Scenario, frames: u64) -> ExitCode {
    let mut run = match SimulationRun::new(params, scenario) {
        Ok(run) => run,
        Err(err) => {
            error!("cannot start simulation: {err}");
            return ExitCode::FAILURE;
        }
    };

    for _ in 0..frames {
        run.step(HEADLESS_DELTA);
    }

    let stats = run.last_stats();
    info!(
        "{scenario}: {} frames, {} of {} agents arrived",
        run.frame(),
        stats.arrived_agents,
        run.agents().len()
    );
    for (i, position) in run.positions().enumerate() {
        println!("{i}\t{:.4}\t{:.4}\t{:.4}", position.x, position.y, position.z);
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let params = args.params();
    if let Err(err) = params.validate() {
        error!("invalid configuration: {err}");
        return ExitCode::FAILURE;
    }

    match args.headless {
        Some(frames) => run_headless(params, args.scenario, frames),
        None => {
            app::launch(ViewerOptions {
                params,
                scenario: args.scenario,
            });
            ExitCode::SUCCESS
        }
    }
}
