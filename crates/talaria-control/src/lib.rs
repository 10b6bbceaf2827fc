// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Talaria Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-loop process control and run orchestration.
//!
//! Shell PID, the fixed-step simulation driver and parallel sweeps.

pub mod driver;
pub mod pid;
pub mod sweep;
