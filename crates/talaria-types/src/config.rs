// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{TalariaError, TalariaResult};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of fixed steps in one run.
const MAX_STEPS: f64 = 1e9;

/// Run parameter set. Immutable for the lifetime of a run.
///
/// Serialized names of the process-facing fields follow the parameter
/// table (`adhesion_limit_nN`, `pid_gains {Kp, Ki, Kd}`, ...). Every field
/// after `duration_s` is optional in JSON and falls back to the
/// High-Precision defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Fluid (vortex) rotation rate.
    pub fluid_rpm: f64,
    /// Magnet rotation rate. Slip is `fluid_rpm - magnet_rpm`.
    pub magnet_rpm: f64,
    /// Dynamic viscosity at the operating temperature (Pa·s).
    pub viscosity: f64,
    #[serde(rename = "adhesion_limit_nN")]
    pub adhesion_limit_nn: f64,
    pub vapor_radius_setpoint_um: f64,
    pub pid_gains: PidGains,
    pub lift_velocity_mm_s: f64,
    pub soft_start_s: f64,
    pub growth_rate_um_s: f64,
    pub dt_s: f64,
    pub duration_s: f64,
    #[serde(default)]
    pub soft_start_profile: SoftStartProfile,
    /// Vapor radius at t = 0.
    #[serde(default = "default_initial_vapor_radius")]
    pub initial_vapor_radius_um: f64,
    /// Std-dev of Gaussian noise on the measured vapor radius (0 = ideal sensor).
    #[serde(default)]
    pub sensor_noise_um: f64,
    #[serde(default = "default_particle_density")]
    pub particle_density_kg_m3: f64,
    #[serde(default = "default_fluid_density")]
    pub fluid_density_kg_m3: f64,
    #[serde(default)]
    pub thermal: ThermalParams,
    #[serde(default)]
    pub geometry: Geometry,
}

/// Vapor-shell PID gains. Error is in µm, output in W.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    #[serde(rename = "Kp")]
    pub kp: f64,
    #[serde(rename = "Ki")]
    pub ki: f64,
    #[serde(rename = "Kd")]
    pub kd: f64,
}

/// Shape of the lift-velocity soft-start ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftStartProfile {
    #[default]
    Linear,
    Smoothstep,
}

/// Lumped Leidenfrost shell thermodynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalParams {
    /// First-order thermal response time (s).
    #[serde(default = "default_time_constant")]
    pub time_constant_s: f64,
    /// Equilibrium shell volume per unit inductive power (µm³/W).
    #[serde(default = "default_volume_gain")]
    pub volume_gain_um3_per_w: f64,
    /// Constant condensation loss into the subcooled bulk (µm³/s).
    #[serde(default = "default_condensation")]
    pub condensation_um3_s: f64,
    /// Additional condensation per mm/s of lift velocity (µm³/s per mm/s).
    #[serde(default = "default_convective_quench")]
    pub convective_quench_um3_per_mm: f64,
    /// Inductive source ceiling (W).
    #[serde(default = "default_power_max")]
    pub power_max_w: f64,
}

fn default_time_constant() -> f64 {
    2.0
}
fn default_volume_gain() -> f64 {
    1.0e5
}
fn default_condensation() -> f64 {
    1.0e5
}
fn default_convective_quench() -> f64 {
    2.0e5
}
fn default_power_max() -> f64 {
    250.0
}

impl Default for ThermalParams {
    fn default() -> Self {
        ThermalParams {
            time_constant_s: default_time_constant(),
            volume_gain_um3_per_w: default_volume_gain(),
            condensation_um3_s: default_condensation(),
            convective_quench_um3_per_mm: default_convective_quench(),
            power_max_w: default_power_max(),
        }
    }
}

/// Reactor, particle and filament geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Radius of the carrier's orbit in the vortex (tank radius).
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius_mm: f64,
    /// MWCNT filament radius.
    #[serde(default = "default_filament_radius")]
    pub filament_radius_nm: f64,
    /// Janus catalyst particle radius.
    #[serde(default = "default_core_radius")]
    pub core_radius_um: f64,
    /// Shell radius at which liquid-phase drag is quartered.
    #[serde(default = "default_buffer_length")]
    pub buffer_length_um: f64,
    /// Lumped wall-shear / bundling correction on slender-body drag.
    #[serde(default = "default_shear_coupling")]
    pub shear_coupling: f64,
}

fn default_orbit_radius() -> f64 {
    50.0
}
fn default_filament_radius() -> f64 {
    20.0
}
fn default_core_radius() -> f64 {
    3.0
}
fn default_buffer_length() -> f64 {
    100.0
}
fn default_shear_coupling() -> f64 {
    42.5
}
fn default_initial_vapor_radius() -> f64 {
    50.0
}
fn default_particle_density() -> f64 {
    crate::constants::RHO_CATALYST
}
fn default_fluid_density() -> f64 {
    crate::constants::RHO_DODECANE
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            orbit_radius_mm: default_orbit_radius(),
            filament_radius_nm: default_filament_radius(),
            core_radius_um: default_core_radius(),
            buffer_length_um: default_buffer_length(),
            shear_coupling: default_shear_coupling(),
        }
    }
}

impl ParameterSet {
    /// High-Precision mode: 180 °C dodecane, 0.05 RPM slip, anchored Co-Mo
    /// catalyst, 1 m target.
    pub fn high_precision() -> Self {
        ParameterSet {
            fluid_rpm: 100.0,
            magnet_rpm: 99.95,
            viscosity: 0.4e-3,
            adhesion_limit_nn: 400.0,
            vapor_radius_setpoint_um: 150.0,
            pid_gains: PidGains {
                kp: 2.0,
                ki: 0.5,
                kd: 0.05,
            },
            lift_velocity_mm_s: 0.4,
            soft_start_s: 20.0,
            growth_rate_um_s: 80.0,
            dt_s: 0.1,
            duration_s: 12_500.0,
            soft_start_profile: SoftStartProfile::Linear,
            initial_vapor_radius_um: default_initial_vapor_radius(),
            sensor_noise_um: 0.0,
            particle_density_kg_m3: default_particle_density(),
            fluid_density_kg_m3: default_fluid_density(),
            thermal: ThermalParams::default(),
            geometry: Geometry::default(),
        }
    }

    /// Mass Production mode: ~125 °C, 0.2 RPM motor tolerance, standard
    /// 300 nN catalyst bond, thicker vapor shell, 250 mm target.
    ///
    /// `duration_s` is sized to the 250 mm target at 80 µm/s (3125 s), not
    /// to the 4200 s batch window of the production line. Run for 4200 s
    /// this preset tears off near 3.8 ks.
    pub fn mass_production() -> Self {
        ParameterSet {
            magnet_rpm: 99.8,
            viscosity: 0.6e-3,
            adhesion_limit_nn: 300.0,
            vapor_radius_setpoint_um: 220.0,
            duration_s: 3_125.0,
            ..Self::high_precision()
        }
    }

    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> TalariaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse from a JSON document and validate.
    pub fn from_json_str(json: &str) -> TalariaResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> TalariaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rotational slip in RPM. Negative when the magnet leads the fluid.
    pub fn slip_rpm(&self) -> f64 {
        self.fluid_rpm - self.magnet_rpm
    }

    /// Number of fixed steps needed to reach `duration_s`, at least one.
    /// A duration within rounding of a whole multiple of `dt_s` is not
    /// padded by an extra step.
    pub fn total_steps(&self) -> u64 {
        let ratio = self.duration_s / self.dt_s;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
            nearest
        } else {
            ratio.ceil()
        };
        steps.max(1.0) as u64
    }

    /// Reject configurations no run may start from.
    pub fn validate(&self) -> TalariaResult<()> {
        require_positive("dt_s", self.dt_s)?;
        require_positive("duration_s", self.duration_s)?;
        if self.duration_s / self.dt_s > MAX_STEPS {
            return Err(TalariaError::ConfigError(format!(
                "duration_s / dt_s = {:.3e} exceeds the {MAX_STEPS:.0e} step limit",
                self.duration_s / self.dt_s
            )));
        }

        require_non_negative("fluid_rpm", self.fluid_rpm)?;
        require_non_negative("magnet_rpm", self.magnet_rpm)?;
        require_positive("viscosity", self.viscosity)?;
        require_positive("adhesion_limit_nN", self.adhesion_limit_nn)?;
        require_positive("vapor_radius_setpoint_um", self.vapor_radius_setpoint_um)?;
        require_non_negative("initial_vapor_radius_um", self.initial_vapor_radius_um)?;
        require_non_negative("pid_gains.Kp", self.pid_gains.kp)?;
        require_non_negative("pid_gains.Ki", self.pid_gains.ki)?;
        require_non_negative("pid_gains.Kd", self.pid_gains.kd)?;
        require_non_negative("lift_velocity_mm_s", self.lift_velocity_mm_s)?;
        require_non_negative("soft_start_s", self.soft_start_s)?;
        require_non_negative("growth_rate_um_s", self.growth_rate_um_s)?;
        require_non_negative("sensor_noise_um", self.sensor_noise_um)?;
        require_positive("particle_density_kg_m3", self.particle_density_kg_m3)?;
        require_positive("fluid_density_kg_m3", self.fluid_density_kg_m3)?;

        let th = &self.thermal;
        require_positive("thermal.time_constant_s", th.time_constant_s)?;
        require_positive("thermal.volume_gain_um3_per_w", th.volume_gain_um3_per_w)?;
        require_non_negative("thermal.condensation_um3_s", th.condensation_um3_s)?;
        require_non_negative(
            "thermal.convective_quench_um3_per_mm",
            th.convective_quench_um3_per_mm,
        )?;
        require_positive("thermal.power_max_w", th.power_max_w)?;

        let geo = &self.geometry;
        require_positive("geometry.orbit_radius_mm", geo.orbit_radius_mm)?;
        require_positive("geometry.filament_radius_nm", geo.filament_radius_nm)?;
        require_positive("geometry.core_radius_um", geo.core_radius_um)?;
        require_positive("geometry.buffer_length_um", geo.buffer_length_um)?;
        require_non_negative("geometry.shear_coupling", geo.shear_coupling)?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> TalariaResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TalariaError::ConfigError(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> TalariaResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TalariaError::ConfigError(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_JSON: &str = r#"{
        "fluid_rpm": 100.0,
        "magnet_rpm": 99.9,
        "viscosity": 0.0005,
        "adhesion_limit_nN": 350.0,
        "vapor_radius_setpoint_um": 160.0,
        "pid_gains": { "Kp": 1.5, "Ki": 0.4, "Kd": 0.0 },
        "lift_velocity_mm_s": 0.3,
        "soft_start_s": 10.0,
        "growth_rate_um_s": 60.0,
        "dt_s": 0.05,
        "duration_s": 600.0
    }"#;

    #[test]
    fn test_presets_validate() {
        ParameterSet::high_precision()
            .validate()
            .expect("high-precision preset must validate");
        ParameterSet::mass_production()
            .validate()
            .expect("mass-production preset must validate");
    }

    #[test]
    fn test_preset_slip() {
        let hp = ParameterSet::high_precision();
        let mp = ParameterSet::mass_production();
        assert!((hp.slip_rpm() - 0.05).abs() < 1e-9, "{}", hp.slip_rpm());
        assert!((mp.slip_rpm() - 0.2).abs() < 1e-9, "{}", mp.slip_rpm());
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let p = ParameterSet::from_json_str(MINIMAL_JSON).expect("minimal config should load");
        assert_eq!(p.adhesion_limit_nn, 350.0);
        assert_eq!(p.pid_gains.kp, 1.5);
        assert_eq!(p.soft_start_profile, SoftStartProfile::Linear);
        assert_eq!(p.thermal, ThermalParams::default());
        assert_eq!(p.geometry, Geometry::default());
        assert_eq!(p.sensor_noise_um, 0.0);
        assert_eq!(p.initial_vapor_radius_um, 50.0);
    }

    #[test]
    fn test_partial_nested_section() {
        let json = MINIMAL_JSON.replacen(
            "\"duration_s\": 600.0",
            "\"duration_s\": 600.0, \"thermal\": { \"power_max_w\": 90.0 }, \
             \"soft_start_profile\": \"smoothstep\"",
            1,
        );
        let p = ParameterSet::from_json_str(&json).expect("partial thermal section should load");
        assert_eq!(p.thermal.power_max_w, 90.0);
        assert_eq!(p.thermal.time_constant_s, 2.0);
        assert_eq!(p.soft_start_profile, SoftStartProfile::Smoothstep);
    }

    #[test]
    fn test_json_field_names() {
        let json = ParameterSet::high_precision().to_json().expect("serialize");
        assert!(json.contains("\"adhesion_limit_nN\""), "{json}");
        assert!(json.contains("\"Kp\""), "{json}");
        let back = ParameterSet::from_json_str(&json).expect("reload");
        assert_eq!(back, ParameterSet::high_precision());
    }

    #[test]
    fn test_rejects_non_positive_dt() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let p = ParameterSet {
                dt_s: dt,
                ..ParameterSet::high_precision()
            };
            match p.validate() {
                Err(TalariaError::ConfigError(msg)) => assert!(msg.contains("dt_s"), "{msg}"),
                other => panic!("dt={dt} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_negative_rates() {
        let cases = [
            ParameterSet {
                growth_rate_um_s: -1.0,
                ..ParameterSet::high_precision()
            },
            ParameterSet {
                lift_velocity_mm_s: -0.4,
                ..ParameterSet::high_precision()
            },
            ParameterSet {
                magnet_rpm: -5.0,
                ..ParameterSet::high_precision()
            },
        ];
        for p in cases {
            assert!(p.validate().is_err(), "negative rate accepted: {p:?}");
        }
    }

    #[test]
    fn test_rejects_bad_nested_values() {
        let mut p = ParameterSet::high_precision();
        p.thermal.time_constant_s = 0.0;
        assert!(p.validate().is_err());

        let mut p = ParameterSet::high_precision();
        p.geometry.filament_radius_nm = -20.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_rejects_absurd_step_count() {
        let p = ParameterSet {
            dt_s: 1e-9,
            ..ParameterSet::high_precision()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_total_steps_whole_multiple() {
        let p = ParameterSet::high_precision();
        assert_eq!(p.total_steps(), 125_000);
        let p = ParameterSet {
            dt_s: 0.3,
            duration_s: 1.0,
            ..ParameterSet::high_precision()
        };
        assert_eq!(p.total_steps(), 4);
    }

    #[test]
    fn test_total_steps_at_least_one() {
        let p = ParameterSet {
            dt_s: 1.0,
            duration_s: 1e-10,
            ..ParameterSet::high_precision()
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.total_steps(), 1);
    }

    #[test]
    fn test_mass_production_sized_to_target() {
        let p = ParameterSet::mass_production();
        let length_mm = p.growth_rate_um_s * p.duration_s * 1e-3;
        assert!((length_mm - 250.0).abs() < 1e-9, "{length_mm}");
        assert_eq!(p.total_steps(), 31_250);
    }

    #[test]
    fn test_json_reload_is_bit_exact() {
        let p = ParameterSet {
            magnet_rpm: 91.92694401771625,
            ..ParameterSet::high_precision()
        };
        let back = ParameterSet::from_json_str(&p.to_json().expect("serialize")).expect("reload");
        assert_eq!(back.magnet_rpm.to_bits(), p.magnet_rpm.to_bits(), "{}", back.magnet_rpm);
        assert_eq!(back, p);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ParameterSet::from_file("/nonexistent/talaria.json").unwrap_err();
        assert!(matches!(err, TalariaError::Io(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_json() {
        let err = ParameterSet::from_json_str("{ \"fluid_rpm\": 100.0 }").unwrap_err();
        assert!(matches!(err, TalariaError::Json(_)), "{err:?}");
    }
}
