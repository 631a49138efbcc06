/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonearm_playback::{PlaybackConfig, MAX_CROSSFADE_MS};

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tonearm.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_simulation")]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Simulated seconds per wall-clock second
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,

    /// How often the driver checks for track end
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        default_simulation()
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tonearm.toml` is used if
    /// present. `TONEARM_`-prefixed variables override both, with `__`
    /// between nested keys (`TONEARM_PLAYBACK__VOLUME=40`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!("Config file {path:?} not found")));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TONEARM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if playback.eq_bands == 0 {
            return Err(CliError::Config("eq_bands must be at least 1".to_string()));
        }
        if playback.volume > 100 {
            return Err(CliError::Config(format!(
                "volume must be 0-100, got {}",
                playback.volume
            )));
        }
        if playback.crossfade.duration_ms > MAX_CROSSFADE_MS {
            return Err(CliError::Config(format!(
                "crossfade duration_ms must be at most {MAX_CROSSFADE_MS}, got {}",
                playback.crossfade.duration_ms
            )));
        }
        if playback.crossfade.tick_ms == 0 {
            return Err(CliError::Config("crossfade tick_ms must be positive".to_string()));
        }

        let scale = self.simulation.time_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CliError::Config(format!(
                "time_scale must be a positive number, got {scale}"
            )));
        }
        if self.simulation.poll_interval_ms == 0 {
            return Err(CliError::Config("poll_interval_ms must be positive".to_string()));
        }

        Ok(())
    }
}

// Default values
fn default_simulation() -> SimulationSettings {
    SimulationSettings {
        time_scale: default_time_scale(),
        poll_interval_ms: default_poll_interval_ms(),
    }
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_poll_interval_ms() -> u64 {
    50
}
