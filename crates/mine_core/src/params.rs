//! Run parameters and their up-front validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::MiningType;
use crate::timescale::TimeScaleError;

/// What happens to in-flight truck/station tasks when the run duration
/// elapses. The original operation abandoned them daemon-style; `Drain`
/// instead joins every task spawned during the run (no new mining cycles
/// start once the run is stopping, so draining terminates).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShutdownPolicy {
    #[default]
    Abandon,
    Drain,
}

/// Parameters for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Number of mining trucks.
    pub num_trucks: usize,
    /// Number of unload stations.
    pub num_stations: usize,
    /// Simulated minutes that advance per real second.
    pub sim_time_unit: u32,
    /// Resource the fleet mines.
    pub mining_type: MiningType,
    /// Seed for RNG (for reproducibility). Each truck derives its own
    /// stream from this.
    pub seed: u64,
    /// In-flight task policy at the end of the run.
    pub shutdown: ShutdownPolicy,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_trucks: 5,
            num_stations: 2,
            sim_time_unit: 1,
            mining_type: MiningType::Helium3,
            seed: 0,
            shutdown: ShutdownPolicy::Abandon,
        }
    }
}

/// Configuration errors, reported at construction time rather than mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a run needs at least one mining truck")]
    NoTrucks,
    #[error("a run needs at least one unload station")]
    NoStations,
    #[error("a control center instance can only run once")]
    AlreadyRun,
    #[error(transparent)]
    TimeScale(#[from] TimeScaleError),
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_trucks == 0 {
            return Err(ConfigError::NoTrucks);
        }
        if self.num_stations == 0 {
            return Err(ConfigError::NoStations);
        }
        if self.sim_time_unit == 0 {
            return Err(ConfigError::TimeScale(TimeScaleError::ZeroTimeUnit));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn zero_counts_and_zero_unit_are_rejected() {
        let mut params = SimulationParams::default();
        params.num_trucks = 0;
        assert_eq!(params.validate(), Err(ConfigError::NoTrucks));

        let mut params = SimulationParams::default();
        params.num_stations = 0;
        assert_eq!(params.validate(), Err(ConfigError::NoStations));

        let mut params = SimulationParams::default();
        params.sim_time_unit = 0;
        assert_eq!(
            params.validate(),
            Err(ConfigError::TimeScale(TimeScaleError::ZeroTimeUnit))
        );
    }
}
