// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Simulation Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-step process simulation for filament growth.
//!
//! Each step, in order:
//! 1. Shell PID reads the (optionally noisy) vapor radius → power command
//! 2. Thermal model relaxes the shell toward the commanded volume
//! 3. Tension model evaluates slip drag on the current filament
//! 4. Growth/lift model extends the filament and raises the carrier
//! 5. Failure checks: shell collapse first, then tear-off
//! 6. Completion once the last step of the window has run
//!
//! A run is an iterator of snapshots. It ends at the first terminal
//! status or on an external stop signal and cannot be restarted.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::prelude::*;
use rand_distr::Normal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::pid::VaporShellController;
use talaria_physics::growth::GrowthLiftModel;
use talaria_physics::tension::TensionModel;
use talaria_physics::thermal::ThermalModel;
use talaria_types::config::ParameterSet;
use talaria_types::error::{TalariaError, TalariaResult};
use talaria_types::state::{RunStatus, SimulationState, Snapshot, Verdict};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Cooperative cancellation flag, checked once per step.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Recorded trace and terminal verdict of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub snapshots: Vec<Snapshot>,
    pub verdict: Verdict,
    /// Stopped externally before reaching a terminal status.
    pub cancelled: bool,
}

/// One run of the growth process.
pub struct Simulation {
    params: ParameterSet,
    controller: VaporShellController,
    thermal: ThermalModel,
    tension: TensionModel,
    lift: GrowthLiftModel,
    state: SimulationState,
    rng: StdRng,
    sensor_noise: Option<Normal<f64>>,
    total_steps: u64,
    steps_taken: u64,
    peak_tension_nn: f64,
    peak_tension_time_s: f64,
    stop: Option<StopSignal>,
    cancelled: bool,
}

impl Simulation {
    /// Validate `params` and set up a fresh run at t = 0.
    ///
    /// `seed` feeds the sensor-noise generator; without one the run uses
    /// [`DEFAULT_SEED`] so that repeated runs stay reproducible.
    pub fn new(params: ParameterSet, seed: Option<u64>) -> TalariaResult<Self> {
        params.validate()?;

        let sensor_noise = if params.sensor_noise_um > 0.0 {
            Some(
                Normal::new(0.0, params.sensor_noise_um)
                    .map_err(|e| TalariaError::ConfigError(e.to_string()))?,
            )
        } else {
            None
        };
        let seed = seed.unwrap_or(DEFAULT_SEED);
        let total_steps = params.total_steps();

        debug!(
            slip_rpm = params.slip_rpm(),
            setpoint_um = params.vapor_radius_setpoint_um,
            adhesion_limit_nn = params.adhesion_limit_nn,
            total_steps,
            seed,
            "starting growth run"
        );

        Ok(Simulation {
            controller: VaporShellController::from_params(&params),
            thermal: ThermalModel::from_params(&params),
            tension: TensionModel::from_params(&params),
            lift: GrowthLiftModel::from_params(&params),
            state: SimulationState::new(params.initial_vapor_radius_um),
            rng: StdRng::seed_from_u64(seed),
            sensor_noise,
            total_steps,
            steps_taken: 0,
            peak_tension_nn: 0.0,
            peak_tension_time_s: 0.0,
            stop: None,
            cancelled: false,
            params,
        })
    }

    /// Attach an external stop flag.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.state.status().is_terminal()
    }

    /// Vapor radius as seen by the controller.
    fn measure_radius(&mut self) -> f64 {
        let r = self.state.vapor_radius_um;
        match &self.sensor_noise {
            Some(dist) => (r + dist.sample(&mut self.rng)).max(0.0),
            None => r,
        }
    }

    /// Advance one `dt`. Returns `None` once the run is over.
    pub fn step(&mut self) -> Option<Snapshot> {
        if self.is_finished() {
            return None;
        }
        if self.stop.as_ref().is_some_and(StopSignal::is_stopped) {
            self.cancelled = true;
            debug!(time_s = self.state.time, "growth run cancelled");
            return None;
        }

        let dt = self.params.dt_s;
        let t = self.state.time;

        // 1. Shell controller
        let measured = self.measure_radius();
        let power = self.controller.step(measured, dt, &mut self.state.controller);

        // 2. Shell thermodynamics, quenched by the lift speed currently applied
        let radius = self.thermal.advance(
            power,
            self.state.vapor_radius_um,
            self.state.lift_velocity_mm_s,
            dt,
        );

        // 3. Tension on the filament grown so far
        let tension = self.tension.tension_nn(radius, self.state.yarn_length_mm);

        // 4. Growth and lift
        let adv = self
            .lift
            .advance(t, dt, self.state.yarn_length_mm, self.state.carrier_height_mm);

        self.steps_taken += 1;
        self.state.time = self.steps_taken as f64 * dt;
        self.state.power_w = power;
        self.state.vapor_radius_um = radius;
        self.state.tension_nn = tension;
        self.state.yarn_length_mm = adv.yarn_length_mm;
        self.state.carrier_height_mm = adv.carrier_height_mm;
        self.state.lift_velocity_mm_s = adv.lift_velocity_mm_s;

        if tension > self.peak_tension_nn {
            self.peak_tension_nn = tension;
            self.peak_tension_time_s = self.state.time;
        }

        // 5. Failure predicates, collapse first
        if radius <= 0.0 {
            self.state.finish(RunStatus::ShellCollapsed);
            warn!(
                time_s = self.state.time,
                yarn_length_mm = self.state.yarn_length_mm,
                "vapor shell collapsed"
            );
        } else if tension > self.params.adhesion_limit_nn {
            self.state.finish(RunStatus::TornOff);
            warn!(
                time_s = self.state.time,
                tension_nn = tension,
                adhesion_limit_nn = self.params.adhesion_limit_nn,
                yarn_length_mm = self.state.yarn_length_mm,
                "filament torn off catalyst"
            );
        // 6. End of window
        } else if self.steps_taken >= self.total_steps {
            self.state.finish(RunStatus::Completed);
            info!(
                yarn_length_mm = self.state.yarn_length_mm,
                peak_tension_nn = self.peak_tension_nn,
                "growth run completed"
            );
        }

        Some(self.state.snapshot(self.tension.net_buoyancy_nn(radius)))
    }

    /// Summary of the run so far. Final once [`Self::is_finished`].
    pub fn verdict(&self) -> Verdict {
        let safety_factor = (self.peak_tension_nn > 0.0)
            .then(|| self.params.adhesion_limit_nn / self.peak_tension_nn);
        Verdict {
            status: self.state.status(),
            final_length_mm: self.state.yarn_length_mm,
            peak_tension_nn: self.peak_tension_nn,
            peak_tension_time_s: self.peak_tension_time_s,
            safety_factor,
            steps: self.steps_taken,
        }
    }

    /// Run to the end, recording every snapshot.
    pub fn run(self) -> RunReport {
        self.run_sampled(1)
    }

    /// Run to the end, recording every `stride`-th snapshot and always the last.
    pub fn run_sampled(mut self, stride: usize) -> RunReport {
        let stride = stride.max(1) as u64;
        let remaining = self.total_steps.saturating_sub(self.steps_taken);
        let mut snapshots = Vec::with_capacity((remaining / stride + 1) as usize);

        while let Some(snap) = self.step() {
            if self.steps_taken % stride == 0 || snap.status.is_terminal() {
                snapshots.push(snap);
            }
        }

        RunReport {
            snapshots,
            verdict: self.verdict(),
            cancelled: self.cancelled,
        }
    }

    /// Run to the end without keeping a trace.
    pub fn run_verdict(mut self) -> Verdict {
        while self.step().is_some() {}
        self.verdict()
    }
}

impl Iterator for Simulation {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        self.step()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_finished() {
            return (0, Some(0));
        }
        let remaining = self.total_steps.saturating_sub(self.steps_taken) as usize;
        (0, Some(remaining))
    }
}

impl FusedIterator for Simulation {}
