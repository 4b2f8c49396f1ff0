// meridian_sim/src/nodes/safety.rs

//! Collision and termination node.
//!
//! Runs after the dynamics and obstacle updates of the same tick. Checks,
//! in order of reporting precedence: obstacle collision (SAT between the
//! ego footprint and every obstacle polygon), off-track (lateral Frenet
//! distance beyond half road width plus margin) and goal (arc length past
//! the last checkpoint). Also accumulates the episode progress metrics
//! and publishes them every tick.

use meridian_core::geometry::ConvexPolygon;
use meridian_core::messages::ProgressReport;
use meridian_core::models::bicycle::VehicleParams;

use crate::blackboard::{topics, Message, Termination};
use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

pub struct SafetyNode {
    rate_hz: f64,
    priority: i32,
    params: VehicleParams,
    footprint: ConvexPolygon,
    last_position: Option<(f64, f64)>,
    progress: ProgressReport,
    next_checkpoint: usize,
}

impl SafetyNode {
    pub fn new(params: VehicleParams, rate_hz: f64, priority: i32) -> Self {
        Self {
            rate_hz,
            priority,
            params,
            footprint: ConvexPolygon::with_capacity(4),
            last_position: None,
            progress: ProgressReport::default(),
            next_checkpoint: 0,
        }
    }
}

impl Node for SafetyNode {
    fn name(&self) -> &str {
        "safety"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, _ctx: &mut SimContext) -> Result<(), NodeError> {
        self.last_position = None;
        self.progress = ProgressReport::default();
        self.next_checkpoint = 0;
        Ok(())
    }

    fn on_run(&mut self, _now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        let Some(state) = ctx.frame.vehicle_state().copied() else {
            return Ok(NodeStatus::Skipped);
        };
        let geometry = &ctx.world.geometry;

        // Collision has the highest reporting precedence.
        self.params.write_footprint(&state, &mut self.footprint);
        if ctx.world.obstacles.collides_with(&self.footprint) {
            ctx.frame.raise_termination(Termination::Collision);
        }

        let frenet = geometry.centerline.project(state.pose().position());
        if frenet.l.abs() > geometry.half_width + geometry.off_track_margin {
            ctx.frame.raise_termination(Termination::OffTrack);
        }

        while self.next_checkpoint < geometry.checkpoints.len()
            && frenet.s + 1e-9 >= geometry.checkpoints[self.next_checkpoint]
        {
            self.next_checkpoint += 1;
        }
        if !geometry.checkpoints.is_empty() && self.next_checkpoint == geometry.checkpoints.len() {
            ctx.frame.raise_termination(Termination::GoalReached);
        }

        if let Some((lx, ly)) = self.last_position {
            self.progress.distance_travelled += (state.x - lx).hypot(state.y - ly);
        }
        self.last_position = Some((state.x, state.y));
        self.progress.checkpoints_passed = self.next_checkpoint as u32;
        self.progress.lateral_deviation = frenet.l;
        self.progress.max_lateral_deviation = self.progress.max_lateral_deviation.max(frenet.l.abs());
        self.progress.arc_length = frenet.s;

        ctx.frame
            .publish(topics::PROGRESS, Message::Progress(self.progress));
        Ok(NodeStatus::Ok)
    }
}
