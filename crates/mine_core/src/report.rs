//! Final statistics report: fixed-width truck and station tables.

use std::sync::Arc;

use crate::station::UnloadStation;
use crate::truck::MiningTruck;

/// Renders the end-of-run report as raw lines for the log sink. Callers are
/// expected to snapshot stats after the run has quiesced; this only formats.
pub fn render(
    trucks: &[Arc<MiningTruck>],
    stations: &[Arc<UnloadStation>],
    total_minutes: u64,
) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(String::new());
    lines.push(format!(
        "=== Mining Operation Report ({total_minutes} simulated minutes) ==="
    ));

    lines.push(String::new());
    lines.push(format!(
        "{:<16} | {:>12} | {:>14} | {:>12}",
        "Truck", "loads mined", "mining minutes", "wait minutes"
    ));
    for truck in trucks {
        let stats = truck.stats();
        lines.push(format!(
            "{:<16} | {:>12} | {:>14} | {:>12}",
            truck.display_name(),
            stats.loads_mined,
            stats.minutes_mined,
            stats.minutes_waited
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "{:<16} | {:>12} | {:>12}",
        "Station", "unloads", "busy minutes"
    ));
    for station in stations {
        let stats = station.stats();
        lines.push(format!(
            "{:<16} | {:>12} | {:>12}",
            station.name(),
            stats.total_unloads,
            stats.busy_minutes
        ));
    }
    lines
}
