// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Parameter Sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Independent runs executed in parallel.
//!
//! Every case owns its own `Simulation`; nothing is shared between
//! threads, so no locking is involved.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::driver::Simulation;
use talaria_types::config::ParameterSet;
use talaria_types::error::TalariaResult;
use talaria_types::state::Verdict;

/// A labelled parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepCase {
    pub label: String,
    pub params: ParameterSet,
}

impl SweepCase {
    pub fn new(label: impl Into<String>, params: ParameterSet) -> Self {
        SweepCase {
            label: label.into(),
            params,
        }
    }
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub label: String,
    /// Invalid configurations surface here instead of aborting the sweep.
    pub result: TalariaResult<Verdict>,
}

/// The two named operating modes.
pub fn operating_modes() -> Vec<SweepCase> {
    vec![
        SweepCase::new("High-Precision", ParameterSet::high_precision()),
        SweepCase::new("Mass Production", ParameterSet::mass_production()),
    ]
}

/// Copies of `base` with the magnet detuned to each slip (RPM).
pub fn slip_scan(base: &ParameterSet, slips_rpm: &[f64]) -> Vec<SweepCase> {
    slips_rpm
        .iter()
        .map(|&slip| {
            let params = ParameterSet {
                magnet_rpm: base.fluid_rpm - slip,
                ..base.clone()
            };
            SweepCase::new(format!("slip {slip:.3} rpm"), params)
        })
        .collect()
}

/// Run every case to its verdict. Output order matches input order.
///
/// Case `i` is seeded with `seed + i` so noisy runs stay reproducible
/// and independent of thread scheduling.
pub fn run_sweep(cases: &[SweepCase], seed: Option<u64>) -> Vec<SweepOutcome> {
    cases
        .par_iter()
        .enumerate()
        .map(|(i, case)| SweepOutcome {
            label: case.label.clone(),
            result: Simulation::new(case.params.clone(), seed.map(|s| s.wrapping_add(i as u64)))
                .map(Simulation::run_verdict),
        })
        .collect()
}
