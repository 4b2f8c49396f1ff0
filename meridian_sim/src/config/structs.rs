// meridian_sim/src/config/structs.rs

//! Scenario configuration structs.
//!
//! These map directly to the sections of a scenario TOML file. Unknown
//! fields are rejected so typos fail loudly at load time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use meridian_core::models::bicycle::VehicleParams;
use meridian_core::obstacle::{ObstacleShape, Waypoint};
use meridian_core::types::Pose2;

/// Root of a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub track: TrackConfig,
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub lidar: Option<LidarConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub obstacle_manager: ObstacleManagerConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Base clock rate in Hz; one tick advances 1/rate seconds.
    pub clock_rate_hz: f64,
    /// Episode cap in simulated seconds.
    pub duration: f64,
    /// Seed for sensor noise and any other stochastic component.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            clock_rate_hz: 100.0,
            duration: 60.0,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackConfig {
    /// Centreline points as `[x, y]` pairs.
    pub points: Vec<[f64; 2]>,
    #[serde(default = "default_half_width")]
    pub half_width: f64,
    #[serde(default = "default_off_track_margin")]
    pub off_track_margin: f64,
    /// Arc-length spacing of intermediate checkpoints; the track end is
    /// always the final checkpoint.
    #[serde(default = "default_checkpoint_spacing")]
    pub checkpoint_spacing: f64,
}

fn default_half_width() -> f64 {
    3.5
}

fn default_off_track_margin() -> f64 {
    0.5
}

fn default_checkpoint_spacing() -> f64 {
    20.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleConfig {
    pub params: VehicleParams,
    pub initial_pose: Pose2,
    pub initial_speed: f64,
    pub rate_hz: f64,
    pub priority: i32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            params: VehicleParams::default(),
            initial_pose: Pose2::default(),
            initial_speed: 0.0,
            rate_hz: 100.0,
            priority: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LidarConfig {
    pub beams: usize,
    /// Field of view in degrees, centred on the mount heading.
    pub fov_deg: f64,
    pub range_min: f64,
    pub range_max: f64,
    /// Additive Gaussian range noise stddev; zero disables noise.
    pub noise_stddev: f64,
    /// Mount pose in the vehicle body frame.
    pub mount: Pose2,
    pub rate_hz: f64,
    pub priority: i32,
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            beams: 181,
            fov_deg: 270.0,
            range_min: 0.1,
            range_max: 30.0,
            noise_stddev: 0.0,
            mount: Pose2::default(),
            rate_hz: 20.0,
            priority: 10,
        }
    }
}

/// Declarative obstacle list entry. The recognised kinds are the closed
/// set `static` and `dynamic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleConfig {
    Static { shape: ObstacleShape, pose: Pose2 },
    Dynamic {
        shape: ObstacleShape,
        waypoints: Vec<Waypoint>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerConfig {
    /// Pure-pursuit centreline follower.
    Follower {
        #[serde(default = "default_lookahead")]
        lookahead: f64,
        #[serde(default = "default_target_speed")]
        target_speed: f64,
        #[serde(default = "default_speed_gain")]
        speed_gain: f64,
        #[serde(default = "default_controller_rate")]
        rate_hz: f64,
        #[serde(default = "default_controller_priority")]
        priority: i32,
    },
    /// Constant open-loop command.
    Scripted {
        #[serde(default)]
        steer: f64,
        #[serde(default)]
        accel: f64,
        #[serde(default = "default_controller_rate")]
        rate_hz: f64,
        #[serde(default = "default_controller_priority")]
        priority: i32,
    },
    /// No in-tree controller; an external collaborator publishes the
    /// command topic.
    External,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig::Follower {
            lookahead: default_lookahead(),
            target_speed: default_target_speed(),
            speed_gain: default_speed_gain(),
            rate_hz: default_controller_rate(),
            priority: default_controller_priority(),
        }
    }
}

fn default_lookahead() -> f64 {
    5.0
}

fn default_target_speed() -> f64 {
    5.0
}

fn default_speed_gain() -> f64 {
    1.0
}

fn default_controller_rate() -> f64 {
    20.0
}

fn default_controller_priority() -> i32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObstacleManagerConfig {
    pub rate_hz: f64,
    pub priority: i32,
}

impl Default for ObstacleManagerConfig {
    fn default() -> Self {
        Self {
            rate_hz: 100.0,
            priority: 40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyConfig {
    pub rate_hz: f64,
    pub priority: i32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            rate_hz: 100.0,
            priority: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecorderConfig {
    pub enabled: bool,
    /// JSON-lines output path; in-memory only when unset.
    pub output: Option<PathBuf>,
    pub rate_hz: f64,
    pub priority: i32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: None,
            rate_hz: 10.0,
            priority: 60,
        }
    }
}
