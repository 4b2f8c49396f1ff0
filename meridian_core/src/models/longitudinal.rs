// meridian_core/src/models/longitudinal.rs

//! Longitudinal acceleration model calibrated by system identification.
//!
//! The realised acceleration is an affine response to the command minus
//! quadratic aerodynamic drag, a cornering-drag term proportional to the
//! effective steering magnitude, and a road-grade term.

use crate::models::GRAVITY;

#[derive(Debug, Clone, Copy)]
pub struct LongitudinalModel {
    /// Gain on the commanded acceleration.
    pub gain: f64,
    /// Constant bias of the drivetrain response.
    pub offset: f64,
    /// Quadratic drag coefficient (per m).
    pub drag_coeff: f64,
    /// Cornering drag coefficient (per m per rad).
    pub corner_drag_coeff: f64,
    /// Realisable acceleration bounds in m/s^2.
    pub accel_min: f64,
    pub accel_max: f64,
}

impl LongitudinalModel {
    /// Realised acceleration for command `command` at speed `speed` with
    /// effective steering `steer_eff` on a grade of `pitch` radians.
    pub fn acceleration(&self, command: f64, speed: f64, steer_eff: f64, pitch: f64) -> f64 {
        let v2 = speed * speed;
        let accel = self.gain * command + self.offset
            - self.drag_coeff * v2
            - self.corner_drag_coeff * steer_eff.abs() * v2
            - GRAVITY * pitch.sin();
        accel.clamp(self.accel_min, self.accel_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model() -> LongitudinalModel {
        LongitudinalModel {
            gain: 1.0,
            offset: 0.0,
            drag_coeff: 0.01,
            corner_drag_coeff: 0.05,
            accel_min: -5.0,
            accel_max: 3.0,
        }
    }

    #[test]
    fn drag_grows_with_the_square_of_speed() {
        let m = model();
        let slow = m.acceleration(1.0, 2.0, 0.0, 0.0);
        let fast = m.acceleration(1.0, 10.0, 0.0, 0.0);
        assert_abs_diff_eq!(slow, 1.0 - 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(fast, 1.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cornering_adds_speed_dependent_drag() {
        let m = model();
        let straight = m.acceleration(1.0, 10.0, 0.0, 0.0);
        let turning = m.acceleration(1.0, 10.0, 0.3, 0.0);
        assert_abs_diff_eq!(straight - turning, 0.05 * 0.3 * 100.0, epsilon = 1e-12);
        // Cornering drag is symmetric in the steering sign.
        assert_abs_diff_eq!(
            turning,
            m.acceleration(1.0, 10.0, -0.3, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn uphill_grade_subtracts_gravity_component() {
        let m = model();
        let flat = m.acceleration(1.0, 0.0, 0.0, 0.0);
        let uphill = m.acceleration(1.0, 0.0, 0.0, 0.1);
        assert_abs_diff_eq!(flat - uphill, GRAVITY * 0.1_f64.sin(), epsilon = 1e-12);
    }

    #[test]
    fn output_saturates_at_the_limits() {
        let m = model();
        assert_eq!(m.acceleration(100.0, 0.0, 0.0, 0.0), 3.0);
        assert_eq!(m.acceleration(-100.0, 0.0, 0.0, 0.0), -5.0);
    }
}
