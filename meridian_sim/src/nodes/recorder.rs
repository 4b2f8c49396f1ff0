// meridian_sim/src/nodes/recorder.rs

//! Per-step telemetry recorder.
//!
//! Buffers a record per invocation and performs no I/O in the fast path;
//! if an output path is configured the buffered records are written as
//! JSON lines during `on_shutdown`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use meridian_core::messages::{ControlCommand, ObstaclePose, ProgressReport, VehicleState};

use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

/// One row of the recorded stream.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub timestamp: f64,
    pub state: Option<VehicleState>,
    pub command: Option<ControlCommand>,
    pub progress: Option<ProgressReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacles: Option<Vec<ObstaclePose>>,
}

pub struct RecorderNode {
    rate_hz: f64,
    priority: i32,
    output: Option<PathBuf>,
    records: Vec<StepRecord>,
}

impl RecorderNode {
    pub fn new(output: Option<PathBuf>, rate_hz: f64, priority: i32) -> Self {
        Self {
            rate_hz,
            priority,
            output,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }
}

impl Node for RecorderNode {
    fn name(&self) -> &str {
        "recorder"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        self.records.push(StepRecord {
            timestamp: now,
            state: ctx.frame.vehicle_state().copied(),
            command: ctx.frame.control_command().copied(),
            progress: ctx.frame.progress().copied(),
            obstacles: ctx.frame.obstacle_poses().map(|poses| poses.to_vec()),
        });
        Ok(NodeStatus::Ok)
    }

    fn on_shutdown(&mut self, _ctx: &mut SimContext) {
        info!(records = self.records.len(), "recorder captured episode");
        let Some(path) = &self.output else {
            return;
        };
        let result = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            for record in &self.records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()
        });
        match result {
            Ok(()) => info!(path = %path.display(), "wrote step records"),
            Err(err) => error!(path = %path.display(), error = %err, "failed to write step records"),
        }
    }
}
