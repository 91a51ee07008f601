/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Series-expansion auxiliary data
//!
//! This module provides the tables every far-field and local expansion of a
//! run shares: multiplicative constants, Gegenbauer polynomial tables and the
//! partial-derivative factors of the kernel.

pub mod auxiliary;
pub mod config;
pub mod errors;
pub mod gegenbauer;
pub mod table;

pub use auxiliary::SeriesExpansionAux;
pub use config::ExpansionConfig;
pub use errors::{Result, SeriesError};
pub use gegenbauer::GegenbauerTable;
pub use table::CoefficientTable;
