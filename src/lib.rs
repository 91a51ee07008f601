/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! # fmm-series-rs
//!
//! Far-field and local series expansions for the inverse-power-distance
//! kernel `|x - y|^{-λ}`, with the translation operators a fast multipole
//! tree needs:
//!
//! * [`FarFieldExpansion::accumulate`] builds multipole moments of weighted
//!   sources around a center,
//! * [`FarFieldExpansion::translate_from_far_field`] merges a child node into
//!   its parent (far-to-far),
//! * [`FarFieldExpansion::translate_to_local`] converts a far node into local
//!   moments of a well-separated region (far-to-local),
//! * [`LocalExpansion::translate_to_local`] pushes local moments down to a
//!   child (local-to-local).
//!
//! All expansions of a run share one read-only [`SeriesExpansionAux`].
//!
//! ```
//! use std::sync::Arc;
//! use fmm_series_rs::{FarFieldExpansion, SeriesExpansionAux, Vector3D};
//!
//! let aux = Arc::new(SeriesExpansionAux::new(1.0, 6).unwrap());
//! let mut far = FarFieldExpansion::new(Vector3D::origin(), aux);
//! far.accumulate(Vector3D::new(0.1, 0.0, -0.1), 1.0, 6).unwrap();
//!
//! let value = far.evaluate_field(Vector3D::new(5.0, 0.0, 0.0), 6).unwrap();
//! assert!((value - 1.0 / (4.9f64 * 4.9 + 0.01).sqrt()).abs() < 1e-8);
//! ```

pub mod coordinates;
pub mod expansion;
pub mod series;
pub mod utils;

pub use coordinates::Vector3D;
pub use expansion::{ExpansionError, FarFieldExpansion, LocalExpansion};
pub use series::{CoefficientTable, ExpansionConfig, GegenbauerTable, SeriesExpansionAux, SeriesError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
