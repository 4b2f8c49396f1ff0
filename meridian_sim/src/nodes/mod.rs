// meridian_sim/src/nodes/mod.rs

//! Built-in simulation nodes.

pub mod follower;
pub mod lidar;
pub mod obstacles;
pub mod recorder;
pub mod safety;
pub mod vehicle;

pub use follower::{CenterlineFollowerNode, ScriptedCommandNode};
pub use lidar::LidarNode;
pub use obstacles::ObstacleManagerNode;
pub use recorder::RecorderNode;
pub use safety::SafetyNode;
pub use vehicle::VehicleNode;
