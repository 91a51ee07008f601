/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Local (Taylor) expansion of a far field around a center
//!
//! The local moments `L(n, a, b)` multiply the monomials of
//! `s = center - point`, which makes the far-to-local operator a plain
//! product of the two multiplicative constants and one partial-derivative
//! factor at the combined index.

use super::errors::{ExpansionError, Result};
use super::{
    check_compatible, check_order, check_point_matrix, check_weighted_batch, point_from_row,
    raised_order, write_coefficients,
};
use crate::coordinates::{
    convert_cartesian_to_spherical, convert_to_complex_form, scaled_root_power, Vector3D,
};
use crate::series::{CoefficientTable, GegenbauerTable, SeriesExpansionAux};
use log::{debug, trace};
use ndarray::{ArrayView1, ArrayView2};
use num_complex::Complex64;
use rayon::prelude::*;
use std::fmt;
use std::io::Write;
use std::ops::Range;
use std::sync::Arc;

/// Truncated local expansion valid near its center
#[derive(Debug, Clone)]
pub struct LocalExpansion {
    center: Vector3D,
    coeffs: CoefficientTable<Complex64>,
    order: Option<usize>,
    aux: Arc<SeriesExpansionAux>,
}

impl LocalExpansion {
    /// Create an empty local expansion around `center`
    pub fn new(center: Vector3D, aux: Arc<SeriesExpansionAux>) -> Self {
        Self {
            center,
            coeffs: CoefficientTable::new(aux.max_order()),
            order: None,
            aux,
        }
    }

    /// Center of the expansion
    pub fn center(&self) -> Vector3D {
        self.center
    }

    /// Local moments
    pub fn coeffs(&self) -> &CoefficientTable<Complex64> {
        &self.coeffs
    }

    /// Mutable access for translation operators that write into this expansion
    pub fn coeffs_mut(&mut self) -> &mut CoefficientTable<Complex64> {
        &mut self.coeffs
    }

    /// Highest order populated so far, `None` while empty
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Record that moments up to `order` are populated
    ///
    /// The order never decreases; a lower value leaves it unchanged.
    pub fn set_order(&mut self, order: usize) {
        self.order = raised_order(self.order, order);
    }

    /// Shared auxiliary tables
    pub fn aux(&self) -> &Arc<SeriesExpansionAux> {
        &self.aux
    }

    /// Add the local moments of one far source up to `order`
    pub fn accumulate(&mut self, point: Vector3D, weight: f64, order: usize) -> Result<()> {
        check_order(&self.aux, order)?;

        let d = self.center - point;
        let (radius, theta, phi) = convert_cartesian_to_spherical(d.x, d.y, d.z);
        if radius == 0.0 {
            return Err(ExpansionError::DegenerateGeometry(format!(
                "source placed at the local expansion center {}",
                self.center
            )));
        }

        let mut polynomials = GegenbauerTable::square(order + 1);
        self.aux.gegenbauer_polynomials(theta.cos(), &mut polynomials);
        let constants = self.aux.multiplicative_constants();

        for n in 0..=order {
            for (a, b) in CoefficientTable::<Complex64>::triangle(n) {
                let partial_derivative = self
                    .aux
                    .compute_partial_derivative_factor(n, a, b, radius, theta, phi, &polynomials)?;
                self.coeffs[(n, a, b)] += partial_derivative * (weight * constants[(n, a, b)]);
            }
        }

        self.order = raised_order(self.order, order);
        Ok(())
    }

    /// Accumulate the rows `range` of an `N x 3` point matrix, each row with
    /// its own weight
    pub fn accumulate_coeffs(
        &mut self,
        data: ArrayView2<f64>,
        weights: ArrayView1<f64>,
        range: Range<usize>,
        order: usize,
    ) -> Result<()> {
        check_weighted_batch(&data, &weights, &range)?;
        trace!(
            "Accumulating {} far sources into local expansion at {}",
            range.len(),
            self.center
        );

        for p in range {
            self.accumulate(point_from_row(&data, p), weights[p], order)?;
        }
        Ok(())
    }

    /// Value of the truncated expansion at `point`
    pub fn evaluate_field(&self, point: Vector3D, order: usize) -> Result<f64> {
        if self.order.is_none() {
            return Ok(0.0);
        }
        check_order(&self.aux, order)?;

        let s = self.center - point;
        let (rho, eta, xi) = convert_to_complex_form(s.x, s.y);

        let mut result = 0.0;
        for n in 0..=order {
            for a in 0..=n {
                let z_power = s.z.powi((n - a) as i32);
                for b in 0..=a {
                    let eta_power = scaled_root_power(eta, rho, b);
                    let xi_power = scaled_root_power(xi, rho, a - b);
                    result += (self.coeffs[(n, a, b)] * eta_power * xi_power).re * z_power;
                }
            }
        }

        Ok(result)
    }

    /// Evaluate at every row of an `N x 3` point matrix in parallel
    pub fn evaluate_fields(&self, data: ArrayView2<f64>, order: usize) -> Result<Vec<f64>> {
        check_point_matrix(&data)?;

        (0..data.nrows())
            .into_par_iter()
            .map(|p| self.evaluate_field(point_from_row(&data, p), order))
            .collect()
    }

    /// Re-center this expansion onto `target` and add it there (local-to-local)
    ///
    /// The shift is exact: a polynomial of degree `order` is rewritten around
    /// a new center without truncation.
    pub fn translate_to_local(&self, target: &mut LocalExpansion) -> Result<()> {
        let Some(order) = self.order else {
            return Ok(());
        };
        check_compatible(&self.aux, &target.aux)?;
        check_order(&target.aux, order)?;

        let shift = self.center - target.center;
        if shift.is_near_zero(f64::EPSILON) {
            debug!("Local-to-local translation with coincident centers, adding moments");
            for n in 0..=order {
                let source = self.coeffs.order(n);
                for (dest, src) in target.coeffs.order_mut(n).iter_mut().zip(source) {
                    *dest += *src;
                }
            }
            target.set_order(order);
            return Ok(());
        }

        let (rho, eta, xi) = convert_to_complex_form(shift.x, shift.y);
        let constants = self.aux.multiplicative_constants();

        for n in 0..=order {
            for (a, b) in CoefficientTable::<f64>::triangle(n) {
                let source = self.coeffs[(n, a, b)];

                for n_child in 0..=n {
                    let lower_a = (n_child + a).saturating_sub(n);
                    let upper_a = a.min(n_child);

                    for a_child in lower_a..=upper_a {
                        let z_power = shift.z.powi(((n + a_child) - (a + n_child)) as i32);

                        let lower_b = (a_child + b).saturating_sub(a);
                        let upper_b = b.min(a_child);

                        for b_child in lower_b..=upper_b {
                            let eta_power = scaled_root_power(eta, rho, b - b_child);
                            let xi_power =
                                scaled_root_power(xi, rho, (a + b_child) - (b + a_child));
                            let ratio = constants[(n_child, a_child, b_child)]
                                * constants[(n - n_child, a - a_child, b - b_child)]
                                / constants[(n, a, b)];

                            target.coeffs[(n_child, a_child, b_child)] +=
                                source * eta_power * xi_power * (ratio * z_power);
                        }
                    }
                }
            }
        }

        target.set_order(order);
        Ok(())
    }

    /// Write a human-readable dump of the center and populated moments
    pub fn print_debug<W: Write>(&self, name: &str, stream: &mut W) -> std::io::Result<()> {
        writeln!(stream, "----- SERIESEXPANSION {} ------", name)?;
        writeln!(stream, "Local expansion")?;
        write!(stream, "{}", self)
    }
}

impl fmt::Display for LocalExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Center: {}", self.center)?;
        write_coefficients(f, &self.coeffs, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn aux(max_order: usize) -> Arc<SeriesExpansionAux> {
        Arc::new(SeriesExpansionAux::new(1.0, max_order).unwrap())
    }

    #[test]
    fn test_empty_local_evaluates_to_zero() {
        let local = LocalExpansion::new(Vector3D::origin(), aux(3));
        assert_eq!(local.order(), None);
        assert_eq!(local.evaluate_field(Vector3D::new(0.1, 0.2, 0.3), 3).unwrap(), 0.0);
    }

    #[test]
    fn test_set_order_never_decreases() {
        let mut local = LocalExpansion::new(Vector3D::origin(), aux(5));
        local.set_order(3);
        assert_eq!(local.order(), Some(3));
        local.set_order(1);
        assert_eq!(local.order(), Some(3));
        local.set_order(5);
        assert_eq!(local.order(), Some(5));
    }

    #[test]
    fn test_constant_term_is_potential_at_center() {
        let center = Vector3D::new(0.5, 0.5, 0.5);
        let mut local = LocalExpansion::new(center, aux(4));
        let source = Vector3D::new(3.0, -1.0, 2.0);
        local.accumulate(source, 2.0, 4).unwrap();

        let expected = 2.0 / source.distance(&center);
        assert_relative_eq!(local.coeffs()[(0, 0, 0)].re, expected, epsilon = 1e-14);
        assert_relative_eq!(local.evaluate_field(center, 4).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_gradient_terms() {
        // Near the center the first-order terms reproduce the gradient of w / |x - p|
        let mut local = LocalExpansion::new(Vector3D::origin(), aux(2));
        let source = Vector3D::new(2.0, 1.0, -2.0);
        local.accumulate(source, 1.0, 1).unwrap();

        let h = 1e-3;
        let point = Vector3D::new(h, 0.0, 0.0);
        let r = source.length();
        let expected = 1.0 / r + h * source.x / (r * r * r);
        assert_relative_eq!(local.evaluate_field(point, 1).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_source_at_center_rejected() {
        let mut local = LocalExpansion::new(Vector3D::new(1.0, 1.0, 1.0), aux(2));
        assert!(matches!(
            local.accumulate(Vector3D::new(1.0, 1.0, 1.0), 1.0, 2),
            Err(ExpansionError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_coincident_recentring_adds_moments() {
        let shared = aux(3);
        let mut source = LocalExpansion::new(Vector3D::origin(), shared.clone());
        source.accumulate(Vector3D::new(4.0, 0.0, 1.0), 1.0, 3).unwrap();

        let mut target = LocalExpansion::new(Vector3D::origin(), shared);
        source.translate_to_local(&mut target).unwrap();
        source.translate_to_local(&mut target).unwrap();

        assert_eq!(target.order(), Some(3));
        for n in 0..=3 {
            for (a, b) in CoefficientTable::<Complex64>::triangle(n) {
                assert_eq!(target.coeffs()[(n, a, b)], source.coeffs()[(n, a, b)] * 2.0);
            }
        }
    }

    #[test]
    fn test_recentring_preserves_polynomial() {
        let shared = aux(4);
        let mut parent = LocalExpansion::new(Vector3D::new(0.0, 0.0, 0.0), shared.clone());
        parent.accumulate(Vector3D::new(5.0, 1.0, -3.0), 1.0, 4).unwrap();
        parent.accumulate(Vector3D::new(-4.0, 2.5, 3.0), 0.5, 4).unwrap();

        let mut child = LocalExpansion::new(Vector3D::new(0.2, -0.1, 0.15), shared);
        parent.translate_to_local(&mut child).unwrap();

        for point in [
            Vector3D::new(0.25, -0.05, 0.1),
            Vector3D::new(0.1, -0.2, 0.2),
            Vector3D::new(0.3, 0.0, 0.0),
        ] {
            assert_relative_eq!(
                child.evaluate_field(point, 4).unwrap(),
                parent.evaluate_field(point, 4).unwrap(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_print_debug() {
        let mut local = LocalExpansion::new(Vector3D::origin(), aux(1));
        local.accumulate(Vector3D::new(2.0, 0.0, 0.0), 1.0, 1).unwrap();
        let mut dump = Vec::new();
        local.print_debug("leaf", &mut dump).unwrap();
        let dump = String::from_utf8(dump).unwrap();
        assert!(dump.contains("Local expansion"));
        assert!(dump.contains("order 1:"));
    }
}
