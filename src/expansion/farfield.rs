/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Far-field (multipole) expansion of weighted sources around a center

use super::errors::{ExpansionError, Result};
use super::local::LocalExpansion;
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

/// Truncated multipole expansion of a cluster of sources
///
/// The order starts out empty (`None`) and only grows as sources are
/// accumulated or children are translated in.
#[derive(Debug, Clone)]
pub struct FarFieldExpansion {
    center: Vector3D,
    coeffs: CoefficientTable<Complex64>,
    order: Option<usize>,
    aux: Arc<SeriesExpansionAux>,
}

impl FarFieldExpansion {
    /// Create an empty expansion around `center`
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

    /// Far-field moments
    pub fn coeffs(&self) -> &CoefficientTable<Complex64> {
        &self.coeffs
    }

    /// Highest order accumulated so far, `None` while empty
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Shared auxiliary tables
    pub fn aux(&self) -> &Arc<SeriesExpansionAux> {
        &self.aux
    }

    /// Add the moments of one weighted source up to `order`
    pub fn accumulate(&mut self, point: Vector3D, weight: f64, order: usize) -> Result<()> {
        check_order(&self.aux, order)?;

        let d = point - self.center;
        let (rho, eta, xi) = convert_to_complex_form(d.x, d.y);

        for n in 0..=order {
            for a in 0..=n {
                let z_power = d.z.powi((n - a) as i32);
                for b in 0..=a {
                    let eta_power = scaled_root_power(eta, rho, b);
                    let xi_power = scaled_root_power(xi, rho, a - b);
                    self.coeffs[(n, a, b)] += eta_power * xi_power * (weight * z_power);
                }
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
            "Accumulating {} sources into far field at {}",
            range.len(),
            self.center
        );

        for p in range {
            self.accumulate(point_from_row(&data, p), weights[p], order)?;
        }
        Ok(())
    }

    /// Value of the truncated expansion at `point`
    ///
    /// An empty expansion evaluates to exactly zero for any point and order.
    pub fn evaluate_field(&self, point: Vector3D, order: usize) -> Result<f64> {
        if self.order.is_none() {
            return Ok(0.0);
        }
        check_order(&self.aux, order)?;

        let d = point - self.center;
        let (radius, theta, phi) = convert_cartesian_to_spherical(d.x, d.y, d.z);
        if radius == 0.0 {
            return Err(ExpansionError::DegenerateGeometry(format!(
                "far field evaluated at its own center {}",
                self.center
            )));
        }

        let mut polynomials = GegenbauerTable::square(order + 1);
        self.aux.gegenbauer_polynomials(theta.cos(), &mut polynomials);
        let constants = self.aux.multiplicative_constants();

        let mut result = 0.0;
        for n in 0..=order {
            for (a, b) in CoefficientTable::<Complex64>::triangle(n) {
                let partial_derivative = self
                    .aux
                    .compute_partial_derivative_factor(n, a, b, radius, theta, phi, &polynomials)?;
                let product = self.coeffs[(n, a, b)] * partial_derivative;
                result += constants[(n, a, b)] * product.re;
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

    /// Merge the moments of `child` into this expansion (far-to-far)
    pub fn translate_from_far_field(&mut self, child: &FarFieldExpansion) -> Result<()> {
        let Some(child_order) = child.order else {
            return Ok(());
        };
        check_compatible(&self.aux, &child.aux)?;
        check_order(&self.aux, child_order)?;

        let offset = child.center - self.center;
        if offset.is_near_zero(f64::EPSILON) {
            debug!("Far-to-far translation with coincident centers, adding moments");
            for n in 0..=child_order {
                let source = child.coeffs.order(n);
                for (dest, src) in self.coeffs.order_mut(n).iter_mut().zip(source) {
                    *dest += *src;
                }
            }
        } else {
            self.translate_shifted(&child.coeffs, child_order, offset);
        }

        self.order = raised_order(self.order, child_order);
        Ok(())
    }

    /// Far-to-far translation of `source` moments centered at
    /// `self.center + offset`
    fn translate_shifted(
        &mut self,
        source: &CoefficientTable<Complex64>,
        source_order: usize,
        offset: Vector3D,
    ) {
        let (rho, eta, xi) = convert_to_complex_form(offset.x, offset.y);
        let constants = self.aux.multiplicative_constants();

        for n_prime in 0..=source_order {
            for (a_prime, b_prime) in CoefficientTable::<f64>::triangle(n_prime) {
                let mut contribution = Complex64::new(0.0, 0.0);

                for n in 0..=n_prime {
                    let lower_a = (a_prime + n).saturating_sub(n_prime);
                    let upper_a = n.min(a_prime);

                    for a in lower_a..=upper_a {
                        // (z)^{n' - n - a' + a}
                        let z_power = offset.z.powi(((n_prime + a) - (n + a_prime)) as i32);

                        let lower_b = (b_prime + a).saturating_sub(a_prime);
                        let upper_b = a.min(b_prime);

                        for b in lower_b..=upper_b {
                            let eta_power = scaled_root_power(eta, rho, b_prime - b);
                            let xi_power =
                                scaled_root_power(xi, rho, (a_prime + b) - (a + b_prime));
                            let ratio = constants[(n, a, b)]
                                * constants[(n_prime - n, a_prime - a, b_prime - b)]
                                / constants[(n_prime, a_prime, b_prime)];

                            contribution +=
                                source[(n, a, b)] * eta_power * xi_power * (ratio * z_power);
                        }
                    }
                }

                self.coeffs[(n_prime, a_prime, b_prime)] += contribution;
            }
        }
    }

    /// Add this expansion's influence to the local moments of `target`
    /// (far-to-local), up to `truncation_order` on both sides
    pub fn translate_to_local(
        &self,
        target: &mut LocalExpansion,
        truncation_order: usize,
    ) -> Result<()> {
        if self.order.is_none() {
            return Ok(());
        }
        check_compatible(&self.aux, target.aux())?;
        check_order(&self.aux, truncation_order)?;
        check_order(target.aux(), truncation_order)?;

        let d = target.center() - self.center;
        let (radius, theta, phi) = convert_cartesian_to_spherical(d.x, d.y, d.z);
        if radius == 0.0 {
            return Err(ExpansionError::DegenerateGeometry(format!(
                "far-to-local translation between coincident centers {}",
                self.center
            )));
        }

        // Combined indices reach n + n' <= 2 * truncation_order
        let size = 2 * (truncation_order + 1);
        let mut polynomials = GegenbauerTable::square(size);
        self.aux.gegenbauer_polynomials(theta.cos(), &mut polynomials);

        let combined_order = 2 * truncation_order;
        let mut derivatives = CoefficientTable::<Complex64>::new(combined_order);
        for n in 0..=combined_order {
            for (a, b) in CoefficientTable::<Complex64>::triangle(n) {
                derivatives[(n, a, b)] = self
                    .aux
                    .compute_partial_derivative_factor(n, a, b, radius, theta, phi, &polynomials)?;
            }
        }

        trace!(
            "Far-to-local translation from {} to {} at order {}",
            self.center,
            target.center(),
            truncation_order
        );

        let constants = self.aux.multiplicative_constants();
        let local_moments = target.coeffs_mut();

        for n_prime in 0..=truncation_order {
            for (a_prime, b_prime) in CoefficientTable::<f64>::triangle(n_prime) {
                let local_constant = constants[(n_prime, a_prime, b_prime)];
                let mut contribution = Complex64::new(0.0, 0.0);

                for n in 0..=truncation_order {
                    for (a, b) in CoefficientTable::<f64>::triangle(n) {
                        let partial_derivative =
                            derivatives[(n + n_prime, a + a_prime, b + b_prime)];
                        contribution += self.coeffs[(n, a, b)]
                            * partial_derivative
                            * (local_constant * constants[(n, a, b)]);
                    }
                }

                local_moments[(n_prime, a_prime, b_prime)] += contribution;
            }
        }

        target.set_order(truncation_order);
        Ok(())
    }

    /// Write a human-readable dump of the center and populated moments
    pub fn print_debug<W: Write>(&self, name: &str, stream: &mut W) -> std::io::Result<()> {
        writeln!(stream, "----- SERIESEXPANSION {} ------", name)?;
        writeln!(stream, "Far field expansion")?;
        write!(stream, "{}", self)
    }
}

impl fmt::Display for FarFieldExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Center: {}", self.center)?;
        write_coefficients(f, &self.coeffs, self.order)
    }
}
