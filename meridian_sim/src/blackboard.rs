// meridian_sim/src/blackboard.rs

//! The per-tick shared blackboard.
//!
//! A single-writer, many-reader store of the latest message per topic.
//! No history is kept: ordering within a tick is defined solely by node
//! priority, and readers always see the most recent write. The
//! termination flag is latched — once raised it stays raised for the rest
//! of the episode, and a higher-precedence cause may replace a lower one
//! raised in the same tick.

use std::collections::HashMap;

use meridian_core::messages::{
    ControlCommand, LidarScan, ObstaclePose, ProgressReport, VehicleState,
};

/// Well-known topic keys used by the built-in nodes.
pub mod topics {
    pub const SIM_STATE: &str = "sim_state";
    pub const CONTROL_CMD: &str = "control_cmd";
    pub const LIDAR_SCAN: &str = "lidar_scan";
    pub const OBSTACLE_POSES: &str = "obstacle_poses";
    pub const PROGRESS: &str = "progress";
}

/// The closed set of message variants carried on the blackboard. Writers
/// publish the variant their topic declares; readers pattern-match.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    VehicleState(VehicleState),
    Control(ControlCommand),
    LidarScan(LidarScan),
    ObstaclePoses(Vec<ObstaclePose>),
    Progress(ProgressReport),
}

/// Why the episode is ending. Variants are listed in precedence order;
/// when several conditions hold on the same tick the highest-precedence
/// cause wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Collision,
    OffTrack,
    GoalReached,
}

impl Termination {
    fn rank(self) -> u8 {
        match self {
            Termination::Collision => 0,
            Termination::OffTrack => 1,
            Termination::GoalReached => 2,
        }
    }
}

/// Latest-value store shared by all nodes of an episode.
#[derive(Debug, Default)]
pub struct FrameData {
    topics: HashMap<&'static str, Message>,
    termination: Option<Termination>,
}

impl FrameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `message` as the latest value of `topic`, returning the
    /// value it replaced (useful for reclaiming buffers).
    pub fn publish(&mut self, topic: &'static str, message: Message) -> Option<Message> {
        self.topics.insert(topic, message)
    }

    pub fn get(&self, topic: &str) -> Option<&Message> {
        self.topics.get(topic)
    }

    pub fn vehicle_state(&self) -> Option<&VehicleState> {
        match self.topics.get(topics::SIM_STATE) {
            Some(Message::VehicleState(state)) => Some(state),
            _ => None,
        }
    }

    pub fn control_command(&self) -> Option<&ControlCommand> {
        match self.topics.get(topics::CONTROL_CMD) {
            Some(Message::Control(command)) => Some(command),
            _ => None,
        }
    }

    pub fn lidar_scan(&self) -> Option<&LidarScan> {
        match self.topics.get(topics::LIDAR_SCAN) {
            Some(Message::LidarScan(scan)) => Some(scan),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<&ProgressReport> {
        match self.topics.get(topics::PROGRESS) {
            Some(Message::Progress(progress)) => Some(progress),
            _ => None,
        }
    }

    pub fn obstacle_poses(&self) -> Option<&[ObstaclePose]> {
        match self.topics.get(topics::OBSTACLE_POSES) {
            Some(Message::ObstaclePoses(poses)) => Some(poses),
            _ => None,
        }
    }

    /// Latches a termination cause. A cause can only be replaced by one of
    /// higher precedence; nothing ever clears it.
    pub fn raise_termination(&mut self, cause: Termination) {
        match self.termination {
            Some(current) if current.rank() <= cause.rank() => {}
            _ => self.termination = Some(cause),
        }
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// True once any termination cause has been latched.
    pub fn termination_signal(&self) -> bool {
        self.termination.is_some()
    }
}
