#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Polygon Defence experience.

mod scene;
mod simulation;
mod waves;

use std::{io, time::Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use polygon_defence_core::{SessionPhase, GAME_TITLE};
use polygon_defence_rendering::{
    palette, FrameSimulationBreakdown, Presentation, RenderingBackend, Scene,
};
use polygon_defence_rendering_macroquad::MacroquadBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{scene::populate_scene, simulation::Simulation};

/// Seed used when none is supplied on the command line.
const DEFAULT_SEED: u64 = 0x5eed_2024;

/// Command-line arguments accepted by the Polygon Defence binary.
#[derive(Debug, Parser)]
#[command(name = "polygon-defence", about = "Tower defence against marching polygons")]
struct CliArgs {
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Opens the game window (default).
    Play(PlayArgs),
    /// Prints the spawn queues a seed produces as JSON lines.
    Waves(WavesArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Seed for the wave shuffles.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Render as fast as possible instead of waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,
    /// Draw the frame counter in the corner.
    #[arg(long)]
    show_fps: bool,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            no_vsync: false,
            show_fps: false,
        }
    }
}

#[derive(Debug, Args)]
struct WavesArgs {
    /// First round to report.
    #[arg(long, default_value_t = 1)]
    from: u32,
    /// Last round to report.
    #[arg(long, default_value_t = 10)]
    to: u32,
    /// Seed for the wave shuffles.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

/// Entry point for the Polygon Defence command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level);

    match args.command.unwrap_or_else(|| CliCommand::Play(PlayArgs::default())) {
        CliCommand::Play(play) => run_game(play),
        CliCommand::Waves(report) => {
            let reports = waves::wave_reports(report.seed, report.from, report.to)?;
            waves::write_reports(&reports, io::stdout().lock())
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run_game(args: PlayArgs) -> Result<()> {
    let vsync = !args.no_vsync;
    info!(seed = args.seed, vsync, show_fps = args.show_fps, "starting game");

    let mut simulation = Simulation::new(args.seed);
    let mut scene = Scene::new(SessionPhase::SelectingDifficulty);
    populate_scene(simulation.world(), &mut scene).context("failed to build the initial scene")?;

    let backend = MacroquadBackend::new()
        .with_vsync(vsync)
        .with_show_fps(args.show_fps);
    backend.run(
        Presentation::new(GAME_TITLE, palette::BACKGROUND, scene),
        move |dt, input, scene| {
            let simulation_start = Instant::now();
            simulation.step(dt, &input);
            let simulation_time = simulation_start.elapsed();

            let population_start = Instant::now();
            populate_scene(simulation.world(), scene).context("failed to populate the scene")?;
            scene.exit_requested = simulation.exit_requested();

            Ok(FrameSimulationBreakdown {
                simulation: simulation_time,
                scene_population: population_start.elapsed(),
            })
        },
    )
}
