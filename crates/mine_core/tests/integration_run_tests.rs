use mine_core::control_center::ControlCenter;
use mine_core::params::{ShutdownPolicy, SimulationParams};
use mine_core::test_helpers::CaptureSink;

fn params(num_trucks: usize, num_stations: usize) -> SimulationParams {
    SimulationParams {
        num_trucks,
        num_stations,
        sim_time_unit: 10,
        seed: 42,
        ..SimulationParams::default()
    }
}

#[tokio::test(start_paused = true)]
async fn three_hour_run_logs_start_six_heartbeats_and_completion() {
    let sink = CaptureSink::default();
    let center =
        ControlCenter::with_sink(params(5, 1), Box::new(sink.clone())).expect("control center");

    center.run(3).await.expect("run");

    assert_eq!(sink.count_containing("Mining operation started"), 1);
    assert_eq!(sink.count_containing("Simulation heartbeat"), 6);
    assert_eq!(sink.count_containing("Mining operation complete"), 1);

    // Every logged unload completion incremented the global counter; the
    // counter may only run ahead of the log if a completion raced shutdown.
    let finished_lines = sink.count_containing("finished unloading") as u64;
    assert!(center.total_unloads() >= finished_lines);

    // Unloads can never outnumber the loads the fleet actually mined.
    let loads_mined: u64 = center.trucks().iter().map(|t| t.stats().loads_mined).sum();
    assert!(center.total_unloads() <= loads_mined);
}

#[tokio::test(start_paused = true)]
async fn scarce_stations_force_trucks_to_wait() {
    let sink = CaptureSink::default();
    // 50 first-cycle arrivals land within a 240-simulated-minute window and
    // one station needs 5 minutes per truck, so at least one truck must queue
    // no matter how the mining draws fall.
    let center =
        ControlCenter::with_sink(params(50, 1), Box::new(sink.clone())).expect("control center");

    center.run(12).await.expect("run");

    assert!(sink.count_containing("is waiting for an unload station") > 0);
    let waited: u64 = center.trucks().iter().map(|t| t.stats().minutes_waited).sum();
    assert!(waited > 0);
    // Twelve hours is enough for every truck's first load to be unloaded.
    assert!(center.total_unloads() >= 50);
}

#[tokio::test(start_paused = true)]
async fn plentiful_stations_mean_no_waiting() {
    let sink = CaptureSink::default();
    let center =
        ControlCenter::with_sink(params(2, 2), Box::new(sink.clone())).expect("control center");

    center.run(6).await.expect("run");

    assert_eq!(sink.count_containing("is waiting for an unload station"), 0);
    for truck in center.trucks() {
        assert_eq!(truck.stats().minutes_waited, 0);
    }
}

#[tokio::test(start_paused = true)]
async fn drain_policy_joins_every_in_flight_unload() {
    let sink = CaptureSink::default();
    let mut p = params(3, 1);
    p.shutdown = ShutdownPolicy::Drain;
    let center = ControlCenter::with_sink(p, Box::new(sink.clone())).expect("control center");

    center.run(1).await.expect("run");

    // With the run drained, no unload is left half-done when the report goes
    // out: starts and finishes pair up exactly, and every truck's in-flight
    // cycle was allowed to deliver its load.
    assert_eq!(
        sink.count_containing("started unloading"),
        sink.count_containing("finished unloading")
    );
    assert_eq!(
        sink.count_containing("finished unloading") as u64,
        center.total_unloads()
    );
    assert_eq!(center.total_unloads(), 3);
    assert_eq!(center.waiting_truck_count(), 0);
    assert_eq!(center.available_station_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn report_lists_every_truck_and_station() {
    let sink = CaptureSink::default();
    let center =
        ControlCenter::with_sink(params(3, 2), Box::new(sink.clone())).expect("control center");

    center.run(1).await.expect("run");

    assert_eq!(sink.count_containing("Mining Operation Report"), 1);
    for i in 1..=3 {
        assert!(sink.count_containing(&format!("Truck {i}")) > 0);
    }
    for i in 1..=2 {
        assert!(sink.count_containing(&format!("Station {i}")) > 0);
    }
}
