pub mod control_center;
pub mod logger;
pub mod params;
pub mod report;
pub mod resource;
pub mod station;
pub mod timescale;
pub mod truck;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
