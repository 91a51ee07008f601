/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the expansion module

use crate::series::SeriesError;
use thiserror::Error;

/// Errors raised by far-field and local expansions
#[derive(Error, Debug)]
pub enum ExpansionError {
    /// Requested order is beyond what the shared tables were built for
    #[error("Order {order} exceeds the maximum order {max} of the shared tables")]
    OrderExceedsMaximum { order: usize, max: usize },

    /// Evaluation or translation at a point where the kernel is singular
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Two expansions built for different kernels
    #[error("Incompatible auxiliary tables: {0}")]
    IncompatibleAuxiliary(String),

    /// Malformed point or weight arrays
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure inside the shared series tables
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),
}

/// Result type for expansion operations
pub type Result<T> = std::result::Result<T, ExpansionError>;
