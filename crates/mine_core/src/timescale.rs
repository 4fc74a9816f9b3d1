//! Conversions between simulated minutes and wall-clock seconds.
//!
//! The whole simulation is paced by a single scale factor, the *simulation
//! time unit*: how many simulated minutes advance for every real second.
//! Everything here is a pure function; agents call these at the boundary
//! between "duration in the simulated world" and "how long to actually sleep".

use thiserror::Error;

/// Errors from the time-scale conversions. All of these are configuration
/// errors: they fail fast at the call site rather than clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeScaleError {
    /// The simulation time unit must map one real second to at least one
    /// simulated minute.
    #[error("simulation time unit must be a positive number of minutes per second")]
    ZeroTimeUnit,
    /// `format_elapsed` was handed an end time before its start time.
    #[error("current time precedes the simulation start time")]
    TimeReversed,
}

/// Converts a simulated duration in minutes to the wall-clock seconds the
/// simulation actually waits for it.
pub fn sim_minutes_to_real_secs(sim_minutes: f64, sim_time_unit: u32) -> Result<f64, TimeScaleError> {
    if sim_time_unit == 0 {
        return Err(TimeScaleError::ZeroTimeUnit);
    }
    Ok(sim_minutes / sim_time_unit as f64)
}

/// Converts an elapsed wall-clock span back into simulated minutes,
/// rounded to the nearest minute.
pub fn real_secs_to_sim_minutes(real_secs: f64, sim_time_unit: u32) -> Result<u64, TimeScaleError> {
    if sim_time_unit == 0 {
        return Err(TimeScaleError::ZeroTimeUnit);
    }
    Ok((real_secs * sim_time_unit as f64).round() as u64)
}

/// Renders the simulated time elapsed between two wall-clock instants
/// (seconds since an arbitrary common origin) as an `HH:MM` string.
/// Hours are not capped at 24; a long run keeps counting up.
pub fn format_elapsed(
    start_secs: f64,
    now_secs: f64,
    sim_time_unit: u32,
) -> Result<String, TimeScaleError> {
    if sim_time_unit == 0 {
        return Err(TimeScaleError::ZeroTimeUnit);
    }
    if now_secs < start_secs {
        return Err(TimeScaleError::TimeReversed);
    }
    let minutes = ((now_secs - start_secs) * sim_time_unit as f64) as u64;
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}
