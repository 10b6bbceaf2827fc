// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Growth & Lift
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Filament growth and carrier lift.
//!
//! Growth is chemical and runs at a constant rate from t = 0. Lift is
//! mechanical transport and ramps in over the soft-start window so the
//! shell controller never sees a step change in convective load. The two
//! rates are independent.

use talaria_types::config::{ParameterSet, SoftStartProfile};
use talaria_types::constants::UM_TO_M;

/// Ramp shape on normalized time, clamped to [0, 1].
pub fn ramp(profile: SoftStartProfile, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    match profile {
        SoftStartProfile::Linear => x,
        SoftStartProfile::Smoothstep => x * x * (3.0 - 2.0 * x),
    }
}

/// State advance produced by one growth/lift step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftAdvance {
    pub yarn_length_mm: f64,
    pub carrier_height_mm: f64,
    pub lift_velocity_mm_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthLiftModel {
    pub growth_rate_mm_s: f64,
    pub lift_velocity_mm_s: f64,
    pub soft_start_s: f64,
    pub profile: SoftStartProfile,
}

impl GrowthLiftModel {
    pub fn from_params(params: &ParameterSet) -> Self {
        GrowthLiftModel {
            // µm/s → mm/s
            growth_rate_mm_s: params.growth_rate_um_s * UM_TO_M * 1e3,
            lift_velocity_mm_s: params.lift_velocity_mm_s,
            soft_start_s: params.soft_start_s,
            profile: params.soft_start_profile,
        }
    }

    /// Soft-started lift velocity at `time`. Exactly nominal from
    /// `soft_start_s` on; a zero-length window disables the ramp.
    pub fn effective_lift_velocity(&self, time: f64) -> f64 {
        if self.soft_start_s <= 0.0 || time >= self.soft_start_s {
            return self.lift_velocity_mm_s;
        }
        self.lift_velocity_mm_s * ramp(self.profile, time / self.soft_start_s)
    }

    /// Advance length and carrier height over `[time, time + dt)`.
    pub fn advance(
        &self,
        time: f64,
        dt: f64,
        yarn_length_mm: f64,
        carrier_height_mm: f64,
    ) -> LiftAdvance {
        let v = self.effective_lift_velocity(time);
        LiftAdvance {
            yarn_length_mm: yarn_length_mm + self.growth_rate_mm_s * dt,
            carrier_height_mm: carrier_height_mm + v * dt,
            lift_velocity_mm_s: v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hp() -> GrowthLiftModel {
        GrowthLiftModel::from_params(&ParameterSet::high_precision())
    }

    #[test]
    fn test_ramp_endpoints() {
        for profile in [SoftStartProfile::Linear, SoftStartProfile::Smoothstep] {
            assert_eq!(ramp(profile, 0.0), 0.0);
            assert_eq!(ramp(profile, 1.0), 1.0);
            assert_eq!(ramp(profile, -3.0), 0.0);
            assert_eq!(ramp(profile, 7.0), 1.0);
        }
        assert!((ramp(SoftStartProfile::Smoothstep, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_linear_soft_start() {
        let m = hp();
        assert_eq!(m.effective_lift_velocity(0.0), 0.0);
        assert!((m.effective_lift_velocity(10.0) - 0.2).abs() < 1e-12);
        assert_eq!(m.effective_lift_velocity(20.0), 0.4);
        assert_eq!(m.effective_lift_velocity(5_000.0), 0.4);
    }

    #[test]
    fn test_no_ramp_window() {
        let mut m = hp();
        m.soft_start_s = 0.0;
        assert_eq!(m.effective_lift_velocity(0.0), 0.4);
    }

    #[test]
    fn test_growth_independent_of_ramp() {
        let m = hp();
        let early = m.advance(0.0, 0.1, 0.0, 0.0);
        let late = m.advance(100.0, 0.1, 0.0, 0.0);
        assert_eq!(early.yarn_length_mm, late.yarn_length_mm);
        assert!((early.yarn_length_mm - 0.008).abs() < 1e-12, "{}", early.yarn_length_mm);
        assert!(early.carrier_height_mm < late.carrier_height_mm);
    }

    #[test]
    fn test_full_run_length() {
        let m = hp();
        let mut length = 0.0;
        let mut height = 0.0;
        let dt = 0.1;
        for k in 0..125_000u64 {
            let adv = m.advance(k as f64 * dt, dt, length, height);
            length = adv.yarn_length_mm;
            height = adv.carrier_height_mm;
        }
        assert!((length - 1000.0).abs() < 1e-6, "80 µm/s × 12500 s = 1 m: {length}");
        // Ramp costs half a window of travel.
        let expected = 0.4 * (12_500.0 - 10.0);
        assert!((height - expected).abs() < 0.05, "height {height} vs {expected}");
    }
}
