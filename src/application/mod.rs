// Application layer - Use cases and the traits they depend on
pub mod classifier;
pub mod collector;
pub mod generator;
pub mod history_service;
pub mod process_store;
pub mod simulation_service;
pub mod state_cache;
pub mod stats_service;
