/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Configuration for the series-expansion auxiliary tables

use super::errors::{Result, SeriesError};
use serde::{Deserialize, Serialize};

/// Kernel exponent and truncation limit shared by every expansion of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Exponent λ of the kernel |x - y|^(-λ)
    pub power: f64,
    /// Highest expansion order the tables are built for
    pub max_order: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            power: 1.0, // Coulomb / Newtonian potential
            max_order: 8,
        }
    }
}

impl ExpansionConfig {
    /// Create a new configuration
    pub fn new(power: f64, max_order: usize) -> Self {
        Self { power, max_order }
    }

    /// Check that the kernel exponent is usable
    pub fn validate(&self) -> Result<()> {
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(SeriesError::InvalidPower(self.power));
        }
        Ok(())
    }
}
