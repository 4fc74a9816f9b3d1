//! Unload station agent: drains one truck at a time for a fixed duration.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::control_center::ControlCenter;
use crate::resource::MiningType;
use crate::timescale::{self, TimeScaleError};
use crate::truck::MiningTruck;

/// Running totals for one station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStats {
    /// Trucks fully unloaded at this station.
    pub total_unloads: u64,
    /// Total simulated minutes spent unloading.
    pub busy_minutes: u64,
}

/// One unload station. Toggles between available and unloading for the whole
/// run; the control center owns the roster and decides which truck it gets.
pub struct UnloadStation {
    name: String,
    mining_type: MiningType,
    /// Wall-clock seconds per simulated minute, fixed at construction.
    secs_per_sim_minute: f64,
    /// Wall-clock unload duration, computed on first use and never again.
    unload_wait: OnceLock<Duration>,
    stats: Mutex<StationStats>,
}

impl UnloadStation {
    pub fn new(
        name: impl Into<String>,
        mining_type: MiningType,
        sim_time_unit: u32,
    ) -> Result<Self, TimeScaleError> {
        let secs_per_sim_minute = timescale::sim_minutes_to_real_secs(1.0, sim_time_unit)?;
        Ok(Self {
            name: name.into(),
            mining_type,
            secs_per_sim_minute,
            unload_wait: OnceLock::new(),
            stats: Mutex::new(StationStats::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> StationStats {
        *self.stats.lock().expect("station stats lock")
    }

    fn unload_wait(&self) -> Duration {
        *self.unload_wait.get_or_init(|| {
            Duration::from_secs_f64(
                self.mining_type.unload_minutes() as f64 * self.secs_per_sim_minute,
            )
        })
    }

    /// Unloads one truck: log start, hold the station for the fixed unload
    /// duration, log completion, then hand truck and station back to the
    /// control center. The truck object is passed through unchanged even
    /// when its display name had to be substituted in the log lines.
    pub async fn unload(self: Arc<Self>, truck: Arc<MiningTruck>, center: Arc<ControlCenter>) {
        let logger = center.logger().clone();
        logger.log(format!(
            "{} started unloading {}",
            self.name,
            truck.display_name()
        ));
        sleep(self.unload_wait()).await;
        logger.log(format!(
            "{} finished unloading {}",
            self.name,
            truck.display_name()
        ));
        {
            let mut stats = self.stats.lock().expect("station stats lock");
            stats.total_unloads += 1;
            stats.busy_minutes += self.mining_type.unload_minutes();
        }
        center.unload_complete(truck, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unload_wait_is_computed_once_and_cached() {
        let station = UnloadStation::new("Station 1", MiningType::Helium3, 10).expect("station");
        // 5 sim minutes at 10 minutes/second = 0.5 real seconds.
        assert_eq!(station.unload_wait(), Duration::from_secs_f64(0.5));
        assert_eq!(station.unload_wait(), Duration::from_secs_f64(0.5));
        assert!(station.unload_wait.get().is_some());
    }

    #[test]
    fn zero_time_unit_is_rejected_at_construction() {
        assert!(UnloadStation::new("Station 1", MiningType::Helium3, 0).is_err());
    }
}
