//! Mining truck agent: travel out, mine, travel back, report for unloading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};

use crate::control_center::ControlCenter;
use crate::resource::MiningType;
use crate::timescale::{self, TimeScaleError};

/// Placeholder for trucks registered without a usable display name.
pub const UNKNOWN_TRUCK: &str = "Unknown Truck";

/// Running totals for one truck. Mutated only by the truck's own cycle and
/// the dispatcher callbacks that resolve its events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckStats {
    /// Full loads mined and delivered to the unload queue.
    pub loads_mined: u64,
    /// Total simulated minutes spent mining.
    pub minutes_mined: u64,
    /// Total simulated minutes spent waiting for a free station.
    pub minutes_waited: u64,
}

/// One truck in the fleet. Created once at setup and re-sent on its cycle
/// until the run ends.
pub struct MiningTruck {
    name: String,
    mining_type: MiningType,
    /// Wall-clock seconds per simulated minute, fixed at construction.
    secs_per_sim_minute: f64,
    travel_wait: Duration,
    /// Seed for RNG (for reproducibility); each cycle derives its own stream.
    seed: u64,
    cycles: AtomicU64,
    stats: Mutex<TruckStats>,
    /// Set when the truck is placed on the waiting queue, cleared once the
    /// wait has been accounted for.
    wait_start: Mutex<Option<Instant>>,
}

impl MiningTruck {
    pub fn new(
        name: impl Into<String>,
        mining_type: MiningType,
        sim_time_unit: u32,
        seed: u64,
    ) -> Result<Self, TimeScaleError> {
        let secs_per_sim_minute = timescale::sim_minutes_to_real_secs(1.0, sim_time_unit)?;
        let travel_wait = Duration::from_secs_f64(
            mining_type.travel_minutes() as f64 * secs_per_sim_minute,
        );
        Ok(Self {
            name: name.into(),
            mining_type,
            secs_per_sim_minute,
            travel_wait,
            seed,
            cycles: AtomicU64::new(0),
            stats: Mutex::new(TruckStats::default()),
            wait_start: Mutex::new(None),
        })
    }

    /// Name for log lines; a truck without one is reported as
    /// "Unknown Truck" rather than failing.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_TRUCK
        } else {
            &self.name
        }
    }

    pub fn stats(&self) -> TruckStats {
        *self.stats.lock().expect("truck stats lock")
    }

    pub(crate) fn add_wait_minutes(&self, minutes: u64) {
        self.stats.lock().expect("truck stats lock").minutes_waited += minutes;
    }

    pub(crate) fn mark_wait_start(&self, at: Instant) {
        *self.wait_start.lock().expect("truck wait marker lock") = Some(at);
    }

    /// Takes the wait marker, leaving it unset.
    pub(crate) fn take_wait_start(&self) -> Option<Instant> {
        self.wait_start.lock().expect("truck wait marker lock").take()
    }

    /// One full mining cycle: travel to a site, mine for a random stint,
    /// travel back, then report to the control center. Stats are updated
    /// before the arrival is reported so the dispatcher always sees a
    /// consistent truck. The dispatcher re-sends the truck once its load is
    /// unloaded, so cycles repeat until the run stops.
    pub async fn mining_run(self: Arc<Self>, center: Arc<ControlCenter>) {
        if center.is_stopping() {
            return;
        }
        let logger = center.logger().clone();
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed);

        logger.log(format!(
            "{} left the control center for a mining site",
            self.display_name()
        ));
        sleep(self.travel_wait).await;
        logger.log(format!("{} arrived at the mining site", self.display_name()));

        // Fresh seeded RNG per cycle keeps draws independent and the whole
        // run reproducible from a single seed.
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(cycle));
        let mining_minutes = rng.gen_range(self.mining_type.mining_minutes());
        logger.log(format!(
            "{} will mine for {} minutes",
            self.display_name(),
            mining_minutes
        ));
        sleep(Duration::from_secs_f64(
            mining_minutes as f64 * self.secs_per_sim_minute,
        ))
        .await;
        logger.log(format!(
            "{} left the mining site with a full load",
            self.display_name()
        ));
        sleep(self.travel_wait).await;

        {
            let mut stats = self.stats.lock().expect("truck stats lock");
            stats.loads_mined += 1;
            stats.minutes_mined += mining_minutes;
        }
        // A stale marker from an earlier cycle must not leak into the next
        // wait measurement.
        self.take_wait_start();

        logger.log(format!(
            "{} arrived at the unload queue, ready to unload",
            self.display_name()
        ));
        center.truck_arrived(self);
    }
}
