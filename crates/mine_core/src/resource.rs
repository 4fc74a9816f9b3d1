//! Mined resource kinds and their per-kind operating constants.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Kind of resource being mined. Helium-3 is the only kind today; a new
/// resource is a new variant carrying its own durations, and the control
/// center stays unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiningType {
    Helium3,
}

impl MiningType {
    /// One-way travel time between the control center area and a mining
    /// site, in simulated minutes.
    pub fn travel_minutes(self) -> u64 {
        match self {
            MiningType::Helium3 => 30,
        }
    }

    /// Range a mining stint is drawn from, in simulated minutes.
    pub fn mining_minutes(self) -> RangeInclusive<u64> {
        match self {
            MiningType::Helium3 => 60..=300,
        }
    }

    /// Time a station needs to unload one truck, in simulated minutes.
    pub fn unload_minutes(self) -> u64 {
        match self {
            MiningType::Helium3 => 5,
        }
    }
}
