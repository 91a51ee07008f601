/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Gegenbauer polynomial tables
//!
//! The angular part of `|x|^{-λ}` and of its derivatives is carried by
//! Gegenbauer polynomials `C_r^β(cos θ)` with `β = λ/2 + m`. A table row `m`
//! holds the parameter shift and a column `r` the degree.

/// Row-major matrix of Gegenbauer polynomial values at one argument
#[derive(Debug, Clone, PartialEq)]
pub struct GegenbauerTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl GegenbauerTable {
    /// Create a zero-filled table with `rows` parameter shifts and `cols` degrees
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Square table of side `size`
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Number of parameter shifts held
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of degrees held
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value of `C_r^{α + m}` at the argument the table was filled for
    pub fn get(&self, m: usize, r: usize) -> f64 {
        debug_assert!(m < self.rows && r < self.cols);
        self.values[m * self.cols + r]
    }

    /// Fill every entry with `C_r^{alpha + m}(x)`
    ///
    /// Uses the three-term recurrence
    /// `r C_r = 2x (r + β - 1) C_{r-1} - (r + 2β - 2) C_{r-2}`.
    pub fn fill(&mut self, alpha: f64, x: f64) {
        let cols = self.cols;
        for (m, row) in self.values.chunks_mut(cols.max(1)).enumerate() {
            let beta = alpha + m as f64;
            for r in 0..cols {
                let value = match r {
                    0 => 1.0,
                    1 => 2.0 * beta * x,
                    _ => {
                        let rf = r as f64;
                        (2.0 * x * (rf + beta - 1.0) * row[r - 1]
                            - (rf + 2.0 * beta - 2.0) * row[r - 2])
                            / rf
                    }
                };
                row[r] = value;
            }
        }
    }
}
