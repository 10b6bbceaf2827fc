// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Standard gravity (m/s²)
pub const G: f64 = 9.81;

/// Dodecane viscosity at room temperature (Pa·s).
/// Baseline for the drag-reduction figure; the process runs hot (0.4–0.6 mPa·s).
pub const VISCOSITY_ROOM_TEMPERATURE: f64 = 1.2e-3;

/// Dodecane density (kg/m³), approximate.
pub const RHO_DODECANE: f64 = 750.0;

/// Co-Fe / Co-Mo catalyst alloy density (kg/m³)
pub const RHO_CATALYST: f64 = 8900.0;

/// rev/min → rad/s
pub const RPM_TO_RAD_S: f64 = std::f64::consts::TAU / 60.0;

/// Unit conversions used at the model boundaries.
pub const MM_TO_M: f64 = 1e-3;
pub const UM_TO_M: f64 = 1e-6;
pub const NM_TO_M: f64 = 1e-9;
pub const N_TO_NN: f64 = 1e9;
