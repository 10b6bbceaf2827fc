// ─────────────────────────────────────────────────────────────────────
// Talaria Core — Talaria Physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Lumped, zero-dimensional process models.
//!
//! Leidenfrost shell thermodynamics, slip-driven filament tension and
//! decoupled growth / lift kinematics. All models are stateless.

pub mod growth;
pub mod tension;
pub mod thermal;
