// meridian_core/src/models/bicycle.rs

//! Kinematic bicycle model with midpoint speed integration.

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_angle, write_rectangle, ConvexPolygon};
use crate::messages::VehicleState;
use crate::types::Pose2;

/// Geometric and actuator parameters of the ego vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleParams {
    /// Distance between the axles in metres.
    pub wheelbase: f64,
    /// Overall body width in metres.
    pub width: f64,
    /// Overall body length in metres.
    pub length: f64,
    /// Distance from the rear axle to the rear bumper in metres.
    pub rear_overhang: f64,

    // Steering actuator (FOPDT), identified from drive data.
    pub steer_gain: f64,
    pub steer_time_constant: f64,
    pub steer_dead_time: f64,
    /// Steering angle saturation in radians.
    pub max_steer: f64,

    // Longitudinal response, identified from drive data.
    pub accel_gain: f64,
    pub accel_offset: f64,
    pub drag_coeff: f64,
    pub corner_drag_coeff: f64,
    pub accel_min: f64,
    pub accel_max: f64,

    /// Whether the vehicle may integrate to negative speeds.
    pub allow_reverse: bool,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            wheelbase: 2.5,
            width: 1.8,
            length: 4.4,
            rear_overhang: 0.9,
            steer_gain: 1.0,
            steer_time_constant: 0.27,
            steer_dead_time: 0.24,
            max_steer: 0.61,
            accel_gain: 1.0,
            accel_offset: 0.0,
            drag_coeff: 0.0008,
            corner_drag_coeff: 0.012,
            accel_min: -5.0,
            accel_max: 3.0,
            allow_reverse: false,
        }
    }
}

impl VehicleParams {
    /// Pose of the body rectangle's centre. The state tracks the rear
    /// axle, so the body centre sits half a length minus the rear overhang
    /// ahead of it.
    pub fn body_center(&self, state: &VehicleState) -> Pose2 {
        let forward = 0.5 * self.length - self.rear_overhang;
        let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
        Pose2::new(
            state.x + forward * cos_yaw,
            state.y + forward * sin_yaw,
            state.yaw,
        )
    }

    /// Writes the vehicle footprint polygon for the given state into `out`.
    pub fn write_footprint(&self, state: &VehicleState, out: &mut ConvexPolygon) {
        let center = self.body_center(state);
        write_rectangle(&center, self.length, self.width, out);
    }
}

/// Advances the pose and speed by one step of `dt` seconds.
///
/// Speed integrates first; positions use the midpoint speed, which removes
/// the first-order drift of plain forward Euler under constant
/// acceleration.
pub fn step_bicycle(
    state: &VehicleState,
    params: &VehicleParams,
    steer_eff: f64,
    accel: f64,
    dt: f64,
) -> VehicleState {
    let mut v_next = state.vx + accel * dt;
    if !params.allow_reverse {
        v_next = v_next.max(0.0);
    }
    let v_avg = 0.5 * (state.vx + v_next);
    let yaw_rate = v_avg / params.wheelbase * steer_eff.tan();

    VehicleState {
        x: state.x + v_avg * state.yaw.cos() * dt,
        y: state.y + v_avg * state.yaw.sin() * dt,
        yaw: normalize_angle(state.yaw + yaw_rate * dt),
        vx: v_next,
        steer_eff,
        steer_cmd_last: state.steer_cmd_last,
        timestamp: state.timestamp + dt,
    }
}
