//! Headless runner for the Anvesha navigation engine.
//!
//! Runs a fixed number of ticks against a configured arena and prints
//! periodic progress plus a final mission summary.

use anvesha_nav::{Mode, Pattern, Result, SimConfig, Simulation};
use clap::Parser;
use log::info;
use std::path::Path;

/// Search-and-rescue simulation runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long, default_value = "anvesha.toml")]
    config: String,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 2000)]
    ticks: u64,

    /// Coverage pattern: grid | spiral | perimeter | random
    #[arg(short, long, default_value = "grid")]
    pattern: Pattern,

    /// Operating mode: auto | manual | search-rescue
    #[arg(short, long, default_value = "auto")]
    mode: Mode,

    /// Override the RNG seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a progress line every N ticks
    #[arg(long, default_value_t = 100)]
    report_interval: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = Path::new(&args.config);
    let mut config = if config_path.exists() {
        info!("loading configuration from {}", config_path.display());
        SimConfig::load(config_path)?
    } else {
        info!("using default configuration");
        SimConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut sim = Simulation::new(config);
    sim.set_pattern(args.pattern);
    sim.set_mode(args.mode);
    info!(
        "running {} ticks, pattern {}, mode {}",
        args.ticks,
        args.pattern.name(),
        args.mode.name()
    );

    let mut last = None;
    for _ in 0..args.ticks {
        let report = sim.tick();
        if report.tick % args.report_interval == 0 {
            info!(
                "tick {:>6}  pos ({:>6.2}, {:>6.2})  coverage {:>3}%  found {}  {}",
                report.tick,
                report.position.x,
                report.position.y,
                report.coverage_percent,
                report.targets_found,
                report.status
            );
        }
        last = Some(report);
    }

    if let Some(report) = last {
        info!("mission summary");
        info!("  ticks run:       {}", report.tick);
        info!("  final position:  ({:.2}, {:.2})", report.position.x, report.position.y);
        info!("  coverage:        {}%", report.coverage_percent);
        info!("  targets found:   {}", report.targets_found);
        info!("  final status:    {}", report.status);
    }

    Ok(())
}
