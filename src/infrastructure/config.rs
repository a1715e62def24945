use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    pub collector: CollectorSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CollectorSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// Tunables for the simulation core. The defaults match the documented
/// behavior: 1 s ticks, +/-10% drift, a 15% defect threshold and a 0.5%
/// latent-defect chance per reading.
#[derive(Debug, Deserialize, Clone)]
pub struct SimulationSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_deviation_fraction")]
    pub deviation_fraction: f64,
    #[serde(default = "default_defect_threshold")]
    pub defect_threshold: f64,
    #[serde(default = "default_random_defect_probability")]
    pub random_defect_probability: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            deviation_fraction: default_deviation_fraction(),
            defect_threshold: default_defect_threshold(),
            random_defect_probability: default_random_defect_probability(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_deviation_fraction() -> f64 {
    0.1
}

fn default_defect_threshold() -> f64 {
    0.15
}

fn default_random_defect_probability() -> f64 {
    0.005
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    #[serde(default)]
    pub state: StateSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateSettings {
    #[serde(default = "default_state_dir")]
    pub dir: String,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> String {
    "state".to_string()
}

pub fn load_collector_config() -> anyhow::Result<CollectorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/collector"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_simulation_config() -> anyhow::Result<SimulationConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/simulation"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_state_config() -> anyhow::Result<StateConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/state"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
