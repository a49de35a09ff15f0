use crate::sim_params::SimParams;
use crate::snapshot::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the play area
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SurfaceConfig {
    pub size: f32,
}

// Token population and motion, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TokenConfig {
    pub amount_each: u32,
    pub radius: f32,
    #[serde(default = "default_min_speed")]
    pub min_speed: u32,
    #[serde(default = "default_max_speed")]
    pub max_speed: u32,
}

// Configuration for the tick driver
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    pub total_steps: u64,
    #[serde(default = "default_record_interval_steps")]
    pub record_interval_steps: u64,
    /// Sleep between ticks so the run follows `tick_interval_ms` in wall-clock time.
    #[serde(default)]
    pub realtime: bool,
    /// End the run as soon as a single kind remains.
    #[serde(default = "default_stop_when_settled")]
    pub stop_when_settled: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct InitialConditions {
    #[serde(default)]
    pub seed: u64,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    #[serde(default = "default_true")]
    pub save_tokens_in_snapshot: bool,
    #[serde(default = "default_true")]
    pub save_final_tokens: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub surface: SurfaceConfig,
    pub tokens: TokenConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    pub output: OutputConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            surface: SurfaceConfig { size: 800.0 },
            tokens: TokenConfig {
                amount_each: 20,
                radius: 30.0,
                min_speed: default_min_speed(),
                max_speed: default_max_speed(),
            },
            timing: TimingConfig {
                tick_interval_ms: default_tick_interval_ms(),
                total_steps: 3000,
                record_interval_steps: default_record_interval_steps(),
                realtime: false,
                stop_when_settled: default_stop_when_settled(),
            },
            initial_conditions: InitialConditions::default(),
            output: OutputConfig {
                base_filename: "rps".to_string(),
                save_snapshots: true,
                save_tokens_in_snapshot: true,
                save_final_tokens: true,
                format: OutputFormat::Json,
            },
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.get_sim_params().validate()?;
        if self.timing.total_steps == 0 {
            anyhow::bail!("total_steps must be greater than 0.");
        }
        if self.timing.realtime && self.timing.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be positive when realtime is enabled.");
        }
        if self.output.base_filename.trim().is_empty() {
            anyhow::bail!("output.base_filename must not be empty.");
        }
        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            surface_size: self.surface.size,
            radius: self.tokens.radius,
            amount_each: self.tokens.amount_each,
            min_speed: self.tokens.min_speed,
            max_speed: self.tokens.max_speed,
        }
    }
}

fn default_min_speed() -> u32 {
    SimParams::DEFAULT_MIN_SPEED
}

fn default_max_speed() -> u32 {
    SimParams::DEFAULT_MAX_SPEED
}

fn default_tick_interval_ms() -> u64 {
    30
}

fn default_record_interval_steps() -> u64 {
    10
}

fn default_stop_when_settled() -> bool {
    true
}

fn default_true() -> bool {
    true
}
