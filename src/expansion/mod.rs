/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Far-field and local series expansions
//!
//! Both expansion kinds store one [`CoefficientTable`] of complex moments
//! around a fixed center and share a [`SeriesExpansionAux`] through an `Arc`.
//! The far-field moments are `Σ w d_z^{n-a} u^b v^{a-b}` of the source
//! offsets `d = point - center`; the local moments multiply the same monomials
//! of `s = center - point` for an evaluation point.

pub mod errors;
pub mod farfield;
pub mod local;

pub use errors::{ExpansionError, Result};
pub use farfield::FarFieldExpansion;
pub use local::LocalExpansion;

use crate::coordinates::Vector3D;
use crate::series::{CoefficientTable, SeriesExpansionAux};
use ndarray::{ArrayView1, ArrayView2};
use num_complex::Complex64;
use std::fmt;
use std::ops::Range;

/// Raise an optional order to at least `order`
pub(crate) fn raised_order(current: Option<usize>, order: usize) -> Option<usize> {
    Some(current.map_or(order, |current| current.max(order)))
}

/// Fail when `order` is beyond the tables of `aux`
pub(crate) fn check_order(aux: &SeriesExpansionAux, order: usize) -> Result<()> {
    if order > aux.max_order() {
        return Err(ExpansionError::OrderExceedsMaximum {
            order,
            max: aux.max_order(),
        });
    }
    Ok(())
}

/// Fail when two expansions were built for different kernels
pub(crate) fn check_compatible(ours: &SeriesExpansionAux, theirs: &SeriesExpansionAux) -> Result<()> {
    if ours.power() != theirs.power() {
        return Err(ExpansionError::IncompatibleAuxiliary(format!(
            "kernel power {} does not match {}",
            theirs.power(),
            ours.power()
        )));
    }
    Ok(())
}

/// Points are stored one per row with three columns
pub(crate) fn check_point_matrix(data: &ArrayView2<f64>) -> Result<()> {
    if data.ncols() != 3 {
        return Err(ExpansionError::InvalidInput(format!(
            "expected 3 columns per point, found {}",
            data.ncols()
        )));
    }
    Ok(())
}

/// Validate a batch of weighted points and the row range to read
pub(crate) fn check_weighted_batch(
    data: &ArrayView2<f64>,
    weights: &ArrayView1<f64>,
    range: &Range<usize>,
) -> Result<()> {
    check_point_matrix(data)?;
    if weights.len() != data.nrows() {
        return Err(ExpansionError::InvalidInput(format!(
            "{} weights for {} points",
            weights.len(),
            data.nrows()
        )));
    }
    if range.start > range.end || range.end > data.nrows() {
        return Err(ExpansionError::InvalidInput(format!(
            "row range {:?} outside 0..{}",
            range,
            data.nrows()
        )));
    }
    Ok(())
}

pub(crate) fn point_from_row(data: &ArrayView2<f64>, row: usize) -> Vector3D {
    Vector3D::new(data[[row, 0]], data[[row, 1]], data[[row, 2]])
}

/// Write the populated triangles of a coefficient table, one row `a` per line
pub(crate) fn write_coefficients(
    f: &mut fmt::Formatter<'_>,
    coeffs: &CoefficientTable<Complex64>,
    order: Option<usize>,
) -> fmt::Result {
    let Some(order) = order else {
        return writeln!(f, "(no moments)");
    };

    for n in 0..=order {
        writeln!(f, "order {}:", n)?;
        for a in 0..=n {
            let row = (0..=a)
                .map(|b| {
                    let c = coeffs[(n, a, b)];
                    format!("({:e},{:e})", c.re, c.im)
                })
                .collect::<Vec<_>>();
            writeln!(f, "  {}", row.join(" "))?;
        }
    }
    Ok(())
}
