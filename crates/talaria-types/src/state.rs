// ─────────────────────────────────────────────────────────────────────
// Talaria Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Process status. `Running` is the only non-terminal variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Completed,
    /// Tension exceeded the catalyst adhesion limit.
    TornOff,
    /// Vapor shell radius reached zero.
    ShellCollapsed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    /// Physical failure, as opposed to a completed run.
    pub fn is_failure(self) -> bool {
        matches!(self, RunStatus::TornOff | RunStatus::ShellCollapsed)
    }
}

/// PID accumulators carried from one step to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidMemory {
    /// Anti-windup clamped ∫e dt (µm·s).
    pub integral: f64,
    /// Error from the previous step (µm).
    pub prev_error: f64,
}

/// Mutable run state, one instance per run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub time: f64,
    pub yarn_length_mm: f64,
    pub vapor_radius_um: f64,
    pub controller: PidMemory,
    pub tension_nn: f64,
    pub power_w: f64,
    pub lift_velocity_mm_s: f64,
    pub carrier_height_mm: f64,
    status: RunStatus,
}

impl SimulationState {
    /// Fresh state at t = 0 with the given seed radius.
    pub fn new(initial_vapor_radius_um: f64) -> Self {
        SimulationState {
            time: 0.0,
            yarn_length_mm: 0.0,
            vapor_radius_um: initial_vapor_radius_um,
            controller: PidMemory::default(),
            tension_nn: 0.0,
            power_w: 0.0,
            lift_velocity_mm_s: 0.0,
            carrier_height_mm: 0.0,
            status: RunStatus::Running,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Move to a terminal status. Only the first transition out of
    /// `Running` sticks; returns whether this call changed the status.
    pub fn finish(&mut self, status: RunStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }

    pub fn snapshot(&self, net_buoyancy_nn: f64) -> Snapshot {
        Snapshot {
            time: self.time,
            yarn_length_mm: self.yarn_length_mm,
            vapor_radius_um: self.vapor_radius_um,
            tension_nn: self.tension_nn,
            status: self.status,
            power_w: self.power_w,
            lift_velocity_mm_s: self.lift_velocity_mm_s,
            carrier_height_mm: self.carrier_height_mm,
            net_buoyancy_nn,
        }
    }
}

/// Immutable record of the state at the end of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub yarn_length_mm: f64,
    pub vapor_radius_um: f64,
    pub tension_nn: f64,
    pub status: RunStatus,
    pub power_w: f64,
    pub lift_velocity_mm_s: f64,
    pub carrier_height_mm: f64,
    pub net_buoyancy_nn: f64,
}

/// Terminal summary of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: RunStatus,
    pub final_length_mm: f64,
    pub peak_tension_nn: f64,
    pub peak_tension_time_s: f64,
    /// `adhesion_limit / peak_tension`; `None` when no tension was seen.
    pub safety_factor: Option<f64>,
    pub steps: u64,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Safety margin against the adhesion limit. Unbounded without tension.
    pub fn margin(&self) -> f64 {
        self.safety_factor.unwrap_or(f64::INFINITY)
    }
}
