// meridian_sim/src/config/mod.rs

//! Scenario loading and world construction.

pub mod structs;
pub mod track;

use std::path::Path;

use figment::providers::{Format, Toml};
use figment::Figment;
use tracing::info;

use crate::error::ConfigError;
pub use structs::{
    ControllerConfig, LidarConfig, ObstacleConfig, ObstacleManagerConfig, RecorderConfig,
    SafetyConfig, ScenarioConfig, SimulationConfig, TrackConfig, VehicleConfig,
};

/// Loads a scenario TOML file.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ConfigError> {
    info!(path = %path.display(), "loading scenario");
    let config: ScenarioConfig = Figment::new().merge(Toml::file(path)).extract()?;
    validate(&config)?;
    Ok(config)
}

/// Cross-field validation that serde cannot express. Runs before any node
/// is constructed or initialised.
pub fn validate(config: &ScenarioConfig) -> Result<(), ConfigError> {
    let sim = &config.simulation;
    if !sim.clock_rate_hz.is_finite() || sim.clock_rate_hz <= 0.0 {
        return Err(ConfigError::InvalidRate {
            node: "clock".to_owned(),
            rate: sim.clock_rate_hz,
        });
    }
    if !sim.duration.is_finite() || sim.duration <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "duration must be positive and finite, got {}",
            sim.duration
        )));
    }

    let track = &config.track;
    if track.half_width <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "track half_width must be positive, got {}",
            track.half_width
        )));
    }
    if track.checkpoint_spacing <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "checkpoint_spacing must be positive, got {}",
            track.checkpoint_spacing
        )));
    }

    let params = &config.vehicle.params;
    if params.wheelbase <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "wheelbase must be positive, got {}",
            params.wheelbase
        )));
    }
    if params.max_steer <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "max_steer must be positive, got {}",
            params.max_steer
        )));
    }
    if params.accel_min >= params.accel_max {
        return Err(ConfigError::Invalid(format!(
            "accel limits must satisfy min < max, got [{}, {}]",
            params.accel_min, params.accel_max
        )));
    }

    Ok(())
}
