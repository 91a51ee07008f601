/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the series module

use thiserror::Error;

/// Errors raised while building or querying the series-expansion tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// The kernel exponent must be finite and positive
    #[error("Invalid kernel power: {0}")]
    InvalidPower(f64),

    /// `(n, a, b)` does not satisfy `b <= a <= n`
    #[error("Index ({n}, {a}, {b}) lies outside the expansion triangle")]
    IndexOutOfRange { n: usize, a: usize, b: usize },

    /// Requested order exceeds what the precomputed tables support
    #[error("Order {order} exceeds the supported maximum {max}")]
    OrderTooHigh { order: usize, max: usize },

    /// The Gegenbauer table handed in does not cover the requested index
    #[error("Gegenbauer table of {rows}x{cols} is too small, need at least {needed_rows}x{needed_cols}")]
    GegenbauerTableTooSmall {
        rows: usize,
        cols: usize,
        needed_rows: usize,
        needed_cols: usize,
    },

    /// The kernel is singular at the requested point
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// A specialized Result type for series operations
pub type Result<T> = std::result::Result<T, SeriesError>;
