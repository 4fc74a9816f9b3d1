//! The mining control center: matches arriving trucks to unload stations.
//!
//! This is the dispatch engine. It owns the truck and station rosters, keeps
//! one FIFO queue of available stations and one of waiting trucks, and drives
//! the run's clock. The two dispatch entry points ([ControlCenter::truck_arrived]
//! and [ControlCenter::unload_complete]) are synchronous and take the single
//! state mutex for the whole matching decision, so there is no suspension
//! point inside the critical section: two trucks can never claim the same
//! station, and FIFO order holds on both queues.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use crate::logger::{self, LogConsumer, LogSink, SimulationLogger, StdoutSink};
use crate::params::{ConfigError, ShutdownPolicy, SimulationParams};
use crate::report;
use crate::station::UnloadStation;
use crate::timescale;
use crate::truck::MiningTruck;

/// Cadence of the periodic status log entry, in simulated minutes.
pub const HEARTBEAT_MINUTES: u64 = 30;

/// Shared dispatch state. Head of each queue is the next to be served.
struct DispatchState {
    available_stations: VecDeque<Arc<UnloadStation>>,
    waiting_trucks: VecDeque<Arc<MiningTruck>>,
    total_unloads: u64,
    /// Set once the run duration elapses; stops trucks from being re-sent.
    stopping: bool,
}

pub struct ControlCenter {
    params: SimulationParams,
    trucks: Vec<Arc<MiningTruck>>,
    stations: Vec<Arc<UnloadStation>>,
    state: Mutex<DispatchState>,
    logger: SimulationLogger,
    /// Consumer half of the log channel; taken by the first (only) `run`.
    consumer: Mutex<Option<LogConsumer>>,
    /// Handles of spawned agent tasks, tracked only under [ShutdownPolicy::Drain].
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ControlCenter {
    /// Builds the center with the default stdout log sink.
    pub fn new(params: SimulationParams) -> Result<Arc<Self>, ConfigError> {
        Self::with_sink(params, Box::new(StdoutSink))
    }

    /// Builds the center, validating all parameters up front, and wires the
    /// log channel to the given sink.
    pub fn with_sink(
        params: SimulationParams,
        sink: Box<dyn LogSink>,
    ) -> Result<Arc<Self>, ConfigError> {
        params.validate()?;

        let trucks = (1..=params.num_trucks)
            .map(|i| {
                // Per-truck seed offset in the high bits so per-cycle draws
                // never collide across trucks.
                let seed = params.seed.wrapping_add((i as u64) << 32);
                MiningTruck::new(
                    format!("Truck {i}"),
                    params.mining_type,
                    params.sim_time_unit,
                    seed,
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let stations = (1..=params.num_stations)
            .map(|i| {
                UnloadStation::new(
                    format!("Station {i}"),
                    params.mining_type,
                    params.sim_time_unit,
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (logger, consumer) = logger::channel(sink);
        let state = DispatchState {
            available_stations: stations.iter().cloned().collect(),
            waiting_trucks: VecDeque::new(),
            total_unloads: 0,
            stopping: false,
        };
        Ok(Arc::new(Self {
            params,
            trucks,
            stations,
            state: Mutex::new(state),
            logger,
            consumer: Mutex::new(Some(consumer)),
            tasks: Mutex::new(Vec::new()),
        }))
    }

    pub fn logger(&self) -> &SimulationLogger {
        &self.logger
    }

    pub fn trucks(&self) -> &[Arc<MiningTruck>] {
        &self.trucks
    }

    pub fn stations(&self) -> &[Arc<UnloadStation>] {
        &self.stations
    }

    pub fn total_unloads(&self) -> u64 {
        self.state().total_unloads
    }

    pub fn available_station_count(&self) -> usize {
        self.state().available_stations.len()
    }

    pub fn waiting_truck_count(&self) -> usize {
        self.state().waiting_trucks.len()
    }

    pub fn is_stopping(&self) -> bool {
        self.state().stopping
    }

    fn state(&self) -> MutexGuard<'_, DispatchState> {
        // Poisoning means a panic inside a critical section; the run is
        // already unrecoverable at that point.
        self.state.lock().expect("dispatch state lock")
    }

    /// Spawns a fire-and-forget agent task, keeping its handle when the
    /// shutdown policy will want to join it later.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        if self.params.shutdown == ShutdownPolicy::Drain {
            self.tasks.lock().expect("task list lock").push(handle);
        }
    }

    /// Entry point for trucks reaching the unload queue. If a station is
    /// free the truck is paired with the head of the available queue and an
    /// unload task starts immediately; otherwise the truck's wait starts now
    /// and it joins the back of the waiting queue.
    pub fn truck_arrived(self: &Arc<Self>, truck: Arc<MiningTruck>) {
        let mut state = self.state();
        match state.available_stations.pop_front() {
            Some(station) => {
                self.spawn(station.unload(truck, Arc::clone(self)));
            }
            None => {
                truck.mark_wait_start(Instant::now());
                self.logger.log(format!(
                    "{} is waiting for an unload station",
                    truck.display_name()
                ));
                state.waiting_trucks.push_back(truck);
            }
        }
    }

    /// Entry point for stations finishing an unload. Accounts the truck's
    /// wait (if it had one) and re-sends it on a fresh mining cycle, then
    /// either hands the freed station straight to the first waiting truck or
    /// returns it to the available queue.
    pub fn unload_complete(self: &Arc<Self>, truck: Arc<MiningTruck>, station: Arc<UnloadStation>) {
        let mut state = self.state();
        state.total_unloads += 1;

        if let Some(wait_start) = truck.take_wait_start() {
            let waited_secs = wait_start.elapsed().as_secs_f64();
            let minutes = timescale::real_secs_to_sim_minutes(waited_secs, self.params.sim_time_unit)
                .expect("sim_time_unit validated at construction");
            truck.add_wait_minutes(minutes);
        }

        if !state.stopping {
            self.spawn(Arc::clone(&truck).mining_run(Arc::clone(self)));
        }

        match state.waiting_trucks.pop_front() {
            // The freed station goes straight to the first waiter, skipping
            // the available queue.
            Some(next) => self.spawn(station.unload(next, Arc::clone(self))),
            None => state.available_stations.push_back(station),
        }
    }

    /// Runs the simulation for `duration_hours` simulated hours: starts the
    /// log consumer, sends the whole fleet out, emits a heartbeat every 30
    /// simulated minutes, then finalizes statistics and renders the report.
    /// Blocks until the log queue is fully drained.
    pub async fn run(self: &Arc<Self>, duration_hours: u64) -> Result<(), ConfigError> {
        let unit = self.params.sim_time_unit;
        let total_minutes = duration_hours * 60;

        let consumer = self
            .consumer
            .lock()
            .expect("log consumer lock")
            .take()
            .ok_or(ConfigError::AlreadyRun)?;
        let consumer_handle = consumer.spawn();

        let start = Instant::now();
        self.logger.reset(start, unit);
        self.logger.log(format!(
            "Mining operation started: {} trucks, {} unload stations, 1 second = {} simulated minutes, duration {} hours",
            self.params.num_trucks, self.params.num_stations, unit, duration_hours
        ));

        for truck in &self.trucks {
            self.spawn(Arc::clone(truck).mining_run(Arc::clone(self)));
        }

        let heartbeat_wait = Duration::from_secs_f64(timescale::sim_minutes_to_real_secs(
            HEARTBEAT_MINUTES as f64,
            unit,
        )?);
        for beat in 1..=(total_minutes / HEARTBEAT_MINUTES) {
            sleep(heartbeat_wait).await;
            self.logger.log(format!(
                "Simulation heartbeat: {} of {} simulated minutes elapsed",
                beat * HEARTBEAT_MINUTES,
                total_minutes
            ));
        }
        let leftover_minutes = total_minutes % HEARTBEAT_MINUTES;
        if leftover_minutes > 0 {
            sleep(Duration::from_secs_f64(timescale::sim_minutes_to_real_secs(
                leftover_minutes as f64,
                unit,
            )?))
            .await;
        }

        self.state().stopping = true;
        if self.params.shutdown == ShutdownPolicy::Drain {
            self.drain_tasks().await;
        }

        self.logger.log(format!(
            "Mining operation complete: {} loads unloaded in {} simulated minutes",
            self.total_unloads(),
            total_minutes
        ));
        // Stats are snapshotted only now, after the heartbeat loop ended (and,
        // under Drain, after every in-flight unload finished).
        for line in report::render(&self.trucks, &self.stations, total_minutes) {
            self.logger.log_raw(line);
        }

        self.logger.shutdown();
        consumer_handle.await.expect("log consumer task");
        Ok(())
    }

    /// Joins every tracked agent task, including ones spawned while earlier
    /// batches were being awaited. Terminates because trucks are no longer
    /// re-sent once `stopping` is set.
    async fn drain_tasks(&self) {
        loop {
            let batch: Vec<_> =
                std::mem::take(&mut *self.tasks.lock().expect("task list lock"));
            if batch.is_empty() {
                break;
            }
            for handle in batch {
                let _ = handle.await;
            }
        }
    }
}
