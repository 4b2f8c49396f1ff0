// meridian_sim/src/nodes/vehicle.rs

//! Vehicle dynamics node.
//!
//! Integrates the FOPDT steering actuator, the calibrated longitudinal
//! model and the kinematic bicycle at the node's own rate, consuming the
//! most recent control command on the blackboard. A missing command means
//! the last published one stays in effect; a command that was never
//! published defaults to zero.

use meridian_core::messages::{ControlCommand, VehicleState};
use meridian_core::models::bicycle::{step_bicycle, VehicleParams};
use meridian_core::models::longitudinal::LongitudinalModel;
use meridian_core::models::steering::SteeringActuator;
use meridian_core::types::Pose2;

use crate::blackboard::{topics, Message};
use crate::context::SimContext;
use crate::error::NodeError;
use crate::node::{Node, NodeStatus};

pub struct VehicleNode {
    rate_hz: f64,
    priority: i32,
    dt: f64,
    params: VehicleParams,
    steering: SteeringActuator,
    longitudinal: LongitudinalModel,
    /// Road grade under the vehicle; flat world unless a scenario sets it.
    pitch: f64,
    initial_pose: Pose2,
    initial_speed: f64,
    state: VehicleState,
}

impl VehicleNode {
    pub fn new(
        params: VehicleParams,
        initial_pose: Pose2,
        initial_speed: f64,
        rate_hz: f64,
        priority: i32,
    ) -> Self {
        let steering = SteeringActuator::new(
            params.steer_gain,
            params.steer_time_constant,
            params.steer_dead_time,
            params.max_steer,
            rate_hz,
        );
        let longitudinal = LongitudinalModel {
            gain: params.accel_gain,
            offset: params.accel_offset,
            drag_coeff: params.drag_coeff,
            corner_drag_coeff: params.corner_drag_coeff,
            accel_min: params.accel_min,
            accel_max: params.accel_max,
        };
        Self {
            rate_hz,
            priority,
            dt: 1.0 / rate_hz,
            params,
            steering,
            longitudinal,
            pitch: 0.0,
            initial_pose,
            initial_speed,
            state: VehicleState::default(),
        }
    }

    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch;
    }

    fn initial_state(&self) -> VehicleState {
        VehicleState {
            x: self.initial_pose.x,
            y: self.initial_pose.y,
            yaw: self.initial_pose.yaw,
            vx: self.initial_speed,
            ..Default::default()
        }
    }
}

impl Node for VehicleNode {
    fn name(&self) -> &str {
        "vehicle"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, ctx: &mut SimContext) -> Result<(), NodeError> {
        self.steering.reset();
        self.state = self.initial_state();
        // Publish the initial state so sensors see a pose in tick 0.
        ctx.frame
            .publish(topics::SIM_STATE, Message::VehicleState(self.state));
        Ok(())
    }

    fn on_run(&mut self, _now: f64, ctx: &mut SimContext) -> Result<NodeStatus, NodeError> {
        let command = ctx
            .frame
            .control_command()
            .copied()
            .unwrap_or(ControlCommand::default());

        if !command.steer.is_finite() || !command.accel.is_finite() {
            return Err(NodeError::NonFinite("control command".to_owned()));
        }

        // Saturation is silent and reflected in state.
        let steer_cmd = command.steer.clamp(-self.params.max_steer, self.params.max_steer);
        let steer_eff = self.steering.step(steer_cmd, self.dt);
        let accel = self
            .longitudinal
            .acceleration(command.accel, self.state.vx, steer_eff, self.pitch);

        let mut next = step_bicycle(&self.state, &self.params, steer_eff, accel, self.dt);
        next.steer_cmd_last = steer_cmd;

        if !(next.x.is_finite() && next.y.is_finite() && next.yaw.is_finite() && next.vx.is_finite())
        {
            return Err(NodeError::NonFinite("vehicle state".to_owned()));
        }

        self.state = next;
        ctx.frame
            .publish(topics::SIM_STATE, Message::VehicleState(self.state));
        Ok(NodeStatus::Ok)
    }
}
