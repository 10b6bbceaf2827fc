// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Thermal / Vapor Shell
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Leidenfrost vapor-shell thermodynamics.
//!
//! The shell volume V = r³ stands in for stored thermal energy.
//! Inductive power sets an equilibrium volume V_eq = k·P (so P ∝ r³)
//! and the shell relaxes toward it with a finite response time, while
//! condensation into the subcooled bulk drains it:
//!
//!   V' = V_eq + (V − V_eq)·exp(−dt/τ) − (q₀ + q_v·v_lift)·dt
//!
//! The relaxation is integrated exactly, so any dt is stable. A volume
//! driven to or below zero is clamped to 0 and reads as a collapsed shell.

use talaria_types::config::{ParameterSet, ThermalParams};

/// Vapor-shell response to inductive power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    pub params: ThermalParams,
}

impl ThermalModel {
    pub fn new(params: ThermalParams) -> Self {
        ThermalModel { params }
    }

    pub fn from_params(params: &ParameterSet) -> Self {
        Self::new(params.thermal)
    }

    /// Radius the shell settles at under constant power, ignoring condensation.
    pub fn equilibrium_radius_um(&self, power_w: f64) -> f64 {
        (self.params.volume_gain_um3_per_w * power_w.max(0.0)).cbrt()
    }

    /// Inverse of [`Self::equilibrium_radius_um`]: the cubic power law.
    pub fn power_for_radius_w(&self, radius_um: f64) -> f64 {
        let r = radius_um.max(0.0);
        r * r * r / self.params.volume_gain_um3_per_w
    }

    /// Volume lost per second to the bulk liquid at the given lift speed.
    pub fn condensation_rate_um3_s(&self, lift_velocity_mm_s: f64) -> f64 {
        self.params.condensation_um3_s
            + self.params.convective_quench_um3_per_mm * lift_velocity_mm_s.max(0.0)
    }

    /// Power needed to hold `radius_um` against condensation at steady lift.
    pub fn holding_power_w(&self, radius_um: f64, lift_velocity_mm_s: f64) -> f64 {
        let tau = self.params.time_constant_s;
        self.power_for_radius_w(radius_um)
            + tau * self.condensation_rate_um3_s(lift_velocity_mm_s)
                / self.params.volume_gain_um3_per_w
    }

    /// Advance the shell radius by one step. Never returns a negative radius.
    pub fn advance(
        &self,
        power_w: f64,
        radius_um: f64,
        lift_velocity_mm_s: f64,
        dt: f64,
    ) -> f64 {
        let r = radius_um.max(0.0);
        let volume = r * r * r;
        let v_eq = self.params.volume_gain_um3_per_w * power_w.max(0.0);
        let decay = (-dt / self.params.time_constant_s).exp();

        let next = v_eq + (volume - v_eq) * decay
            - self.condensation_rate_um3_s(lift_velocity_mm_s) * dt;
        if next <= 0.0 {
            0.0
        } else {
            next.cbrt()
        }
    }
}
