// meridian_sim/src/prelude.rs

//! Convenience re-exports for embedding the runtime.

pub use crate::blackboard::{topics, FrameData, Message, Termination};
pub use crate::clock::SimClock;
pub use crate::config::{load_scenario, ScenarioConfig};
pub use crate::context::SimContext;
pub use crate::episode::{EpisodeMetrics, EpisodeOutcome, EpisodeResult, EpisodeStatus};
pub use crate::error::{ConfigError, NodeError, SimError};
pub use crate::executor::{ExecState, Executor, StopCondition};
pub use crate::node::{Node, NodeStatus};
pub use crate::scenario::{build_executor, run_scenario};
pub use crate::world::{WorldGeometry, WorldState};
