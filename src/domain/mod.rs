// Domain layer - Plain data types for the production simulation
pub mod process;
pub mod reading;
pub mod stats;
