// Application state for HTTP handlers
use crate::application::history_service::HistoryService;
use crate::application::process_store::ProcessStore;
use crate::application::simulation_service::SimulationService;
use crate::application::stats_service::StatsAggregator;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<ProcessStore>,
    pub stats: Arc<StatsAggregator>,
    pub history_service: HistoryService,
    pub simulation: Arc<SimulationService>,
}
