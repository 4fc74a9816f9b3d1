use std::process::exit;

use clap::Parser;

use mine_core::control_center::ControlCenter;
use mine_core::params::{ShutdownPolicy, SimulationParams};

/// Simulated minutes advancing per real second; the pacing options the
/// operation supports.
const SIM_TIME_UNITS: [u32; 4] = [1, 2, 5, 10];

#[derive(Parser)]
#[command(
    name = "mine_cli",
    about = "Lunar Helium-3 mining dispatch simulation",
    long_about = "Runs a fleet of mining trucks against a pool of unload stations\n\
                  and reports per-truck and per-station statistics at the end."
)]
struct Cli {
    /// Number of mining trucks
    #[arg(long, default_value_t = 5)]
    trucks: usize,
    /// Number of unload stations
    #[arg(long, default_value_t = 2)]
    stations: usize,
    /// Simulated minutes that advance for every real second (1, 2, 5 or 10)
    #[arg(long, default_value_t = 10, value_parser = parse_time_unit)]
    time_unit: u32,
    /// Run duration in simulated hours
    #[arg(long, default_value_t = 3)]
    hours: u64,
    /// RNG seed for the mining draws
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Wait for in-flight truck and station work at the end of the run
    /// instead of abandoning it
    #[arg(long)]
    drain: bool,
}

fn parse_time_unit(value: &str) -> Result<u32, String> {
    let unit: u32 = value.parse().map_err(|_| "not an integer".to_string())?;
    if SIM_TIME_UNITS.contains(&unit) {
        Ok(unit)
    } else {
        Err(format!("time unit must be one of {SIM_TIME_UNITS:?}"))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let params = SimulationParams {
        num_trucks: cli.trucks,
        num_stations: cli.stations,
        sim_time_unit: cli.time_unit,
        seed: cli.seed,
        shutdown: if cli.drain {
            ShutdownPolicy::Drain
        } else {
            ShutdownPolicy::Abandon
        },
        ..SimulationParams::default()
    };

    let center = match ControlCenter::new(params) {
        Ok(center) => center,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            exit(1);
        }
    };
    if let Err(err) = center.run(cli.hours).await {
        eprintln!("simulation failed: {err}");
        exit(1);
    }
}
