// meridian_sim/src/scenario.rs

//! Assembles and runs an episode from a scenario configuration.

use tracing::info;

use meridian_core::models::perception::lidar_2d::Lidar2dModel;
use meridian_core::obstacle::{Obstacle, ObstacleField};

use crate::clock::SimClock;
use crate::config::{self, track, ControllerConfig, ObstacleConfig, ScenarioConfig};
use crate::context::SimContext;
use crate::episode::EpisodeResult;
use crate::error::{ConfigError, SimError};
use crate::executor::Executor;
use crate::nodes::{
    CenterlineFollowerNode, LidarNode, ObstacleManagerNode, RecorderNode, SafetyNode,
    ScriptedCommandNode, VehicleNode,
};
use crate::world::WorldState;

/// Builds a ready-to-run executor for the scenario. All configuration
/// errors surface here, before any node's `on_init`.
pub fn build_executor(config: &ScenarioConfig) -> Result<Executor, SimError> {
    config::validate(config)?;

    let geometry = track::build_world(&config.track)?;
    let obstacles = build_obstacles(&config.obstacles)?;
    let world = WorldState::new(geometry, ObstacleField::new(obstacles));
    let ctx = SimContext::new(world, config.simulation.seed);
    let clock = SimClock::new(config.simulation.clock_rate_hz);

    let mut executor = Executor::new(clock, ctx);

    let vehicle = &config.vehicle;
    executor.add_node(Box::new(VehicleNode::new(
        vehicle.params,
        vehicle.initial_pose,
        vehicle.initial_speed,
        vehicle.rate_hz,
        vehicle.priority,
    )))?;

    if let Some(lidar) = &config.lidar {
        let half_fov = 0.5 * lidar.fov_deg.to_radians();
        let model = Lidar2dModel::new(
            -half_fov,
            half_fov,
            lidar.beams,
            lidar.range_min,
            lidar.range_max,
            lidar.noise_stddev,
        )
        .map_err(ConfigError::from)?;
        executor.add_node(Box::new(LidarNode::new(
            model,
            lidar.mount,
            lidar.rate_hz,
            lidar.priority,
        )))?;
    }

    match &config.controller {
        ControllerConfig::Follower {
            lookahead,
            target_speed,
            speed_gain,
            rate_hz,
            priority,
        } => {
            executor.add_node(Box::new(CenterlineFollowerNode::new(
                &vehicle.params,
                *lookahead,
                *target_speed,
                *speed_gain,
                *rate_hz,
                *priority,
            )))?;
        }
        ControllerConfig::Scripted {
            steer,
            accel,
            rate_hz,
            priority,
        } => {
            executor.add_node(Box::new(ScriptedCommandNode::new(
                *steer, *accel, *rate_hz, *priority,
            )))?;
        }
        ControllerConfig::External => {
            info!("no in-tree controller; expecting an external command publisher");
        }
    }

    executor.add_node(Box::new(ObstacleManagerNode::new(
        config.obstacle_manager.rate_hz,
        config.obstacle_manager.priority,
    )))?;

    executor.add_node(Box::new(SafetyNode::new(
        vehicle.params,
        config.safety.rate_hz,
        config.safety.priority,
    )))?;

    if config.recorder.enabled {
        executor.add_node(Box::new(RecorderNode::new(
            config.recorder.output.clone(),
            config.recorder.rate_hz,
            config.recorder.priority,
        )))?;
    }

    Ok(executor)
}

/// Runs one episode and assembles the result record, including the exact
/// configuration snapshot that produced it.
pub fn run_scenario(config: &ScenarioConfig) -> Result<EpisodeResult, SimError> {
    let config_snapshot = serde_json::to_value(config)?;
    let mut executor = build_executor(config)?;
    let outcome = executor.run(config.simulation.duration)?;
    Ok(EpisodeResult {
        status: outcome.status,
        metrics: outcome.metrics,
        config_snapshot,
    })
}

fn build_obstacles(configs: &[ObstacleConfig]) -> Result<Vec<Obstacle>, ConfigError> {
    configs
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let built = match entry {
                ObstacleConfig::Static { shape, pose } => Obstacle::new_static(*shape, *pose),
                ObstacleConfig::Dynamic { shape, waypoints } => {
                    Obstacle::new_dynamic(*shape, waypoints)
                }
            };
            built.map_err(|source| ConfigError::Obstacle { index, source })
        })
        .collect()
}
