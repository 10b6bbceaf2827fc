// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Filament Tension
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Slip-driven hydrodynamic tension on the growing filament.
//!
//! Algorithm:
//! 1. Slip: Δω = (ω_fluid − ω_magnet), relative speed v = |Δω|·R_orbit
//! 2. Slender-body drag of the wetted filament (Batchelor):
//!    γ = 2πηL / (ln(2L/r_f) − 0.5), zero below L = 10·r_f
//! 3. Vapor buffering of the liquid-phase drag: b(r) = (1 + r/ℓ)⁻²
//! 4. T = C·v·γ·b(r), C the lumped wall-shear / bundling coupling
//!
//! T grows with |slip| and length and falls with shell radius.

use std::f64::consts::PI;

use talaria_types::config::ParameterSet;
use talaria_types::constants::{
    G, MM_TO_M, NM_TO_M, N_TO_NN, RPM_TO_RAD_S, UM_TO_M, VISCOSITY_ROOM_TEMPERATURE,
};

/// Slender-body theory needs an aspect ratio well above one.
const MIN_ASPECT_RATIO: f64 = 10.0;

/// Rotational slip in rad/s.
pub fn slip_rad_s(fluid_rpm: f64, magnet_rpm: f64) -> f64 {
    (fluid_rpm - magnet_rpm) * RPM_TO_RAD_S
}

/// Resistive drag coefficient of a slender filament (N·s/m).
pub fn slender_body_drag(viscosity: f64, length_m: f64, filament_radius_m: f64) -> f64 {
    if length_m <= MIN_ASPECT_RATIO * filament_radius_m {
        return 0.0;
    }
    let log_term = (2.0 * length_m / filament_radius_m).ln() - 0.5;
    2.0 * PI * viscosity * length_m / log_term
}

/// Fraction of liquid-phase drag left once the vapor shell buffers the
/// particle. 1 without a shell, ¼ at r = ℓ.
pub fn vapor_buffer_factor(radius_um: f64, buffer_length_um: f64) -> f64 {
    let x = 1.0 + radius_um.max(0.0) / buffer_length_um;
    1.0 / (x * x)
}

/// Pure tension model for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensionModel {
    pub slip_speed_m_s: f64,
    pub viscosity: f64,
    pub filament_radius_m: f64,
    pub buffer_length_um: f64,
    pub shear_coupling: f64,
    pub core_radius_m: f64,
    pub particle_density: f64,
    pub fluid_density: f64,
}

impl TensionModel {
    pub fn from_params(params: &ParameterSet) -> Self {
        let geo = &params.geometry;
        let slip = slip_rad_s(params.fluid_rpm, params.magnet_rpm);
        TensionModel {
            slip_speed_m_s: slip.abs() * geo.orbit_radius_mm * MM_TO_M,
            viscosity: params.viscosity,
            filament_radius_m: geo.filament_radius_nm * NM_TO_M,
            buffer_length_um: geo.buffer_length_um,
            shear_coupling: geo.shear_coupling,
            core_radius_m: geo.core_radius_um * UM_TO_M,
            particle_density: params.particle_density_kg_m3,
            fluid_density: params.fluid_density_kg_m3,
        }
    }

    /// Effective drag coefficient seen by the filament (N·s/m).
    pub fn drag_coefficient(&self, vapor_radius_um: f64, yarn_length_mm: f64) -> f64 {
        let gamma = slender_body_drag(
            self.viscosity,
            yarn_length_mm.max(0.0) * MM_TO_M,
            self.filament_radius_m,
        );
        self.shear_coupling * gamma * vapor_buffer_factor(vapor_radius_um, self.buffer_length_um)
    }

    /// Instantaneous filament tension (nN), always ≥ 0.
    pub fn tension_nn(&self, vapor_radius_um: f64, yarn_length_mm: f64) -> f64 {
        self.slip_speed_m_s * self.drag_coefficient(vapor_radius_um, yarn_length_mm) * N_TO_NN
    }

    /// Drag at room temperature without a shell over drag at the operating
    /// point. Length-independent once slender-body theory applies.
    pub fn drag_reduction_factor(&self, vapor_radius_um: f64) -> f64 {
        (VISCOSITY_ROOM_TEMPERATURE / self.viscosity)
            / vapor_buffer_factor(vapor_radius_um, self.buffer_length_um)
    }

    /// Buoyancy of core + vapor minus core weight (nN). Positive lifts.
    pub fn net_buoyancy_nn(&self, vapor_radius_um: f64) -> f64 {
        let sphere = |r: f64| 4.0 / 3.0 * PI * r * r * r;
        let v_core = sphere(self.core_radius_m);
        let v_vapor = sphere(vapor_radius_um.max(0.0) * UM_TO_M);
        let buoyancy = (v_core + v_vapor) * self.fluid_density * G;
        let weight = v_core * self.particle_density * G;
        (buoyancy - weight) * N_TO_NN
    }
}
