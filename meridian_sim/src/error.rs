// meridian_sim/src/error.rs

//! Error types of the simulation runtime.
//!
//! Configuration problems abort before any node is initialised; fatal node
//! errors break the loop after the guaranteed shutdown sweep and surface
//! as episode status `error`. Per-tick `Failed`/`Skipped` outcomes are not
//! errors at all — they are [`crate::node::NodeStatus`] values recorded by
//! the executor.

use meridian_core::centerline::CenterlineError;
use meridian_core::models::perception::lidar_2d::LidarError;
use meridian_core::obstacle::ObstacleError;
use thiserror::Error;

use crate::executor::ExecState;

/// A problem detected while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Scenario(#[from] figment::Error),

    #[error("rate for '{node}' must be positive and finite, got {rate} Hz")]
    InvalidRate { node: String, rate: f64 },

    #[error("invalid track: {0}")]
    Track(#[from] CenterlineError),

    #[error("invalid lidar configuration: {0}")]
    Lidar(#[from] LidarError),

    #[error("invalid obstacle {index}: {source}")]
    Obstacle { index: usize, source: ObstacleError },

    #[error("{0}")]
    Invalid(String),
}

/// A fatal error raised by a node during `on_init` or `on_run`.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("non-finite value in {0}")]
    NonFinite(String),

    #[error("{0}")]
    Other(String),
}

/// Top-level error type of the runtime.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("node '{node}' raised a fatal error: {source}")]
    Node { node: String, source: NodeError },

    #[error("executor cannot run from state {0:?}")]
    InvalidState(ExecState),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
