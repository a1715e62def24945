// Simulation scheduler - advances every running process once per tick
use crate::application::classifier::DefectClassifier;
use crate::application::collector::{CollectorError, ParameterCollector};
use crate::application::generator::ValueGenerator;
use crate::application::process_store::ProcessStore;
use crate::application::stats_service::StatsAggregator;
use crate::domain::process::ProcessId;
use crate::domain::reading::Reading;
use crate::infrastructure::config::SimulationSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// One advanced process on one tick, as published to live subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct TickEvent {
    pub process_id: ProcessId,
    pub reading: Reading,
    pub defective: bool,
}

/// Drives the simulation: a recurring timer that generates, classifies and
/// records a reading for every running process.
///
/// The scheduler has an explicit lifecycle independent of any process:
/// `start` installs the timer once at application startup and the returned
/// handle tears it down at application teardown. Starting or stopping
/// individual processes never touches the timer; a stop issued inside a
/// tick window is observed from the following tick.
pub struct SimulationService {
    store: Arc<ProcessStore>,
    stats: Arc<StatsAggregator>,
    collector: Arc<dyn ParameterCollector>,
    generator: ValueGenerator,
    classifier: DefectClassifier,
    tick_interval: Duration,
    events: broadcast::Sender<TickEvent>,
    failures: broadcast::Sender<CollectorError>,
}

impl SimulationService {
    pub fn new(
        store: Arc<ProcessStore>,
        stats: Arc<StatsAggregator>,
        collector: Arc<dyn ParameterCollector>,
        settings: &SimulationSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let (failures, _) = broadcast::channel(64);
        Self {
            store,
            stats,
            collector,
            generator: ValueGenerator::new(settings.deviation_fraction),
            classifier: DefectClassifier::new(
                settings.defect_threshold,
                settings.random_defect_probability,
            ),
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            events,
            failures,
        }
    }

    /// Install the recurring tick timer and return its lifecycle handle.
    pub fn start(self: Arc<Self>) -> SimulationHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = self.tick_interval;
        let task = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_tick(&mut rng),
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::debug!("simulation scheduler stopped");
        });
        SimulationHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Advance every running process once: generate a reading around its
    /// target, classify it, update stats and history, and forward it to the
    /// collector without blocking the tick.
    pub fn run_tick<R: Rng>(&self, rng: &mut R) {
        for process in self.store.snapshot() {
            if !process.is_running {
                continue;
            }
            let reading = self.generator.generate(&process.target_params, rng);
            let defective = self
                .classifier
                .is_defective(&reading, &process.target_params, rng);
            self.stats.record_production(defective);
            self.store.advance(&process.id, reading.clone());
            self.submit(reading.clone());
            let _ = self.events.send(TickEvent {
                process_id: process.id,
                reading,
                defective,
            });
        }
    }

    /// Live feed of advanced readings, one event per process per tick.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TickEvent> {
        self.events.subscribe()
    }

    /// Collector submission failures. Submissions are fire-and-forget, so
    /// this channel is the only place failures surface besides the log.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<CollectorError> {
        self.failures.subscribe()
    }

    fn submit(&self, reading: Reading) {
        let collector = Arc::clone(&self.collector);
        let failures = self.failures.clone();
        tokio::spawn(async move {
            if let Err(e) = collector.submit_reading(&reading).await {
                tracing::warn!("failed to submit reading to collector: {e}");
                let _ = failures.send(e);
            }
        });
    }
}

/// Lifecycle handle for the installed tick timer.
pub struct SimulationHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    /// Tear the timer down and wait for the scheduler task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
