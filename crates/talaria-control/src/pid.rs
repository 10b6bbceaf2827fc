// ─────────────────────────────────────────────────────────────────────
// Talaria Core — PID
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! PID controller for the Leidenfrost vapor shell.
//!
//! Commands inductive power to hold the shell radius at its setpoint.
//! The controller itself is immutable; its integral and last error live
//! in [`PidMemory`] inside the run state and are passed in on every step.

use talaria_types::config::{ParameterSet, PidGains};
use talaria_types::state::PidMemory;

/// Shell-radius PID with anti-windup and a non-negative power clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaporShellController {
    pub gains: PidGains,
    pub setpoint_um: f64,
    pub power_max_w: f64,
}

impl VaporShellController {
    pub fn new(gains: PidGains, setpoint_um: f64, power_max_w: f64) -> Self {
        VaporShellController {
            gains,
            setpoint_um,
            power_max_w,
        }
    }

    pub fn from_params(params: &ParameterSet) -> Self {
        Self::new(
            params.pid_gains,
            params.vapor_radius_setpoint_um,
            params.thermal.power_max_w,
        )
    }

    /// Bound on |∫e dt| such that the integral term alone never exceeds
    /// the power ceiling. Zero when Ki = 0.
    pub fn integral_limit(&self) -> f64 {
        if self.gains.ki > 0.0 {
            self.power_max_w / self.gains.ki
        } else {
            0.0
        }
    }

    /// One PID step. Returns the power command in [0, power_max_w].
    pub fn step(&self, measured_radius_um: f64, dt: f64, memory: &mut PidMemory) -> f64 {
        let error = self.setpoint_um - measured_radius_um;
        let limit = self.integral_limit();
        memory.integral = (memory.integral + error * dt).clamp(-limit, limit);
        let d_err = (error - memory.prev_error) / dt;
        memory.prev_error = error;

        let raw = self.gains.kp * error + self.gains.ki * memory.integral + self.gains.kd * d_err;
        // The induction coil cannot cool.
        raw.clamp(0.0, self.power_max_w)
    }
}
