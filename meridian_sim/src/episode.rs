// meridian_sim/src/episode.rs

//! Episode outcome types.

use serde::Serialize;

use crate::blackboard::Termination;

/// How the episode ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EpisodeStatus {
    GoalReached,
    OffTrack,
    Collision,
    Timeout,
    /// A node raised a fatal error; the episode is not a valid sample.
    Error { node: String },
}

impl From<Termination> for EpisodeStatus {
    fn from(cause: Termination) -> Self {
        match cause {
            Termination::Collision => EpisodeStatus::Collision,
            Termination::OffTrack => EpisodeStatus::OffTrack,
            Termination::GoalReached => EpisodeStatus::GoalReached,
        }
    }
}

/// Aggregated metrics of one episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EpisodeMetrics {
    pub distance_travelled: f64,
    pub checkpoints_passed: u32,
    pub max_lateral_deviation: f64,
    /// Virtual time at which the episode ended.
    pub duration_sim: f64,
}

/// Per-node invocation counters reported by the executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRunStats {
    pub name: String,
    pub runs: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// What `Executor::run` hands back: the status, the metrics snapshot and
/// the per-node counters.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeOutcome {
    pub status: EpisodeStatus,
    pub metrics: EpisodeMetrics,
    pub node_stats: Vec<NodeRunStats>,
}

/// The single structured record written at shutdown, including the exact
/// configuration that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeResult {
    pub status: EpisodeStatus,
    pub metrics: EpisodeMetrics,
    pub config_snapshot: serde_json::Value,
}
