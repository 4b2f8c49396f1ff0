// meridian_core/src/models/steering.rs

//! First-order-plus-dead-time steering actuator.
//!
//! The commanded steering angle reaches the effective angle through a pure
//! transport delay followed by a first-order lag, the structure identified
//! from recorded drive data: `tau * d(delta_eff)/dt + delta_eff =
//! K * delta_cmd(t - L)`.

/// Fixed-capacity delay line over equally spaced samples.
///
/// Pushing the sample for the current step returns the sample pushed
/// `steps` pushes ago; until the line has filled it returns the initial
/// fill value.
#[derive(Debug, Clone)]
struct DelayLine {
    buf: Vec<f64>,
    head: usize,
}

impl DelayLine {
    fn new(steps: usize, initial: f64) -> Self {
        Self {
            buf: vec![initial; steps + 1],
            head: 0,
        }
    }

    fn push(&mut self, value: f64) -> f64 {
        self.buf[self.head] = value;
        self.head = (self.head + 1) % self.buf.len();
        self.buf[self.head]
    }

    fn reset(&mut self, value: f64) {
        self.buf.fill(value);
        self.head = 0;
    }
}

/// FOPDT steering actuator state.
#[derive(Debug, Clone)]
pub struct SteeringActuator {
    gain: f64,
    time_constant: f64,
    max_steer: f64,
    delay: DelayLine,
    eff: f64,
}

impl SteeringActuator {
    /// Creates an actuator updated at `rate_hz`.
    ///
    /// The delay line is sized to `ceil(dead_time * rate) + 1` samples so
    /// the delayed command lags by at least `dead_time` seconds.
    pub fn new(gain: f64, time_constant: f64, dead_time: f64, max_steer: f64, rate_hz: f64) -> Self {
        let steps = (dead_time * rate_hz).ceil().max(0.0) as usize;
        Self {
            gain,
            time_constant,
            max_steer,
            delay: DelayLine::new(steps, 0.0),
            eff: 0.0,
        }
    }

    /// The current effective steering angle.
    pub fn effective(&self) -> f64 {
        self.eff
    }

    pub fn reset(&mut self) {
        self.delay.reset(0.0);
        self.eff = 0.0;
    }

    /// Advances the actuator by one step of `dt` seconds under `command`.
    pub fn step(&mut self, command: f64, dt: f64) -> f64 {
        let delayed = self.delay.push(command);
        if self.time_constant > 1e-9 {
            self.eff += (dt / self.time_constant) * (self.gain * delayed - self.eff);
        } else {
            self.eff = self.gain * delayed;
        }
        self.eff = self.eff.clamp(-self.max_steer, self.max_steer);
        self.eff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const RATE: f64 = 100.0;
    const DT: f64 = 1.0 / RATE;

    #[test]
    fn dead_time_suppresses_early_response() {
        let mut actuator = SteeringActuator::new(1.0, 0.2, 0.3, 0.6, RATE);
        for step in 0..100 {
            let eff = actuator.step(0.4, DT);
            let t = (step + 1) as f64 * DT;
            if t <= 0.3 {
                assert_eq!(eff, 0.0, "response before the dead time at t={t}");
            }
        }
        // Past the dead time the lag response must have started rising.
        assert!(actuator.effective() > 0.0);
    }

    #[test]
    fn step_converges_to_gain_times_command() {
        let gain = 0.9;
        let tau = 0.15;
        let mut actuator = SteeringActuator::new(gain, tau, 0.1, 0.6, RATE);
        // Five time constants past the dead time reaches steady state.
        let steps = ((0.1 + 5.0 * tau) * RATE).ceil() as usize;
        let mut eff = 0.0;
        for _ in 0..steps {
            eff = actuator.step(0.3, DT);
        }
        assert_abs_diff_eq!(eff, gain * 0.3, epsilon = 0.01);
    }

    #[test]
    fn effective_angle_saturates_at_max_steer() {
        let mut actuator = SteeringActuator::new(2.0, 0.05, 0.0, 0.5, RATE);
        for _ in 0..200 {
            actuator.step(1.0, DT);
        }
        assert_abs_diff_eq!(actuator.effective(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_time_constant_tracks_the_delayed_command() {
        let mut actuator = SteeringActuator::new(1.0, 0.0, 0.02, 0.6, RATE);
        let mut eff = 0.0;
        for _ in 0..3 {
            eff = actuator.step(0.25, DT);
        }
        assert_abs_diff_eq!(eff, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn reset_clears_history() {
        let mut actuator = SteeringActuator::new(1.0, 0.1, 0.1, 0.6, RATE);
        for _ in 0..50 {
            actuator.step(0.4, DT);
        }
        actuator.reset();
        assert_eq!(actuator.effective(), 0.0);
        assert_eq!(actuator.step(0.0, DT), 0.0);
    }
}
