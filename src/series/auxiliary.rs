/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Shared auxiliary tables for inverse-power-distance expansions
//!
//! A multi-index `(n, a, b)` stands for the monomial
//! `d_z^{n-a} u^b v^{a-b}` with `u = d_x + i d_y` and `v = d_x - i d_y`.
//! With that basis:
//!
//! * the multiplicative constant is `C(n, a, b) = 1 / (b! (a-b)! (n-a)!)`,
//! * the partial-derivative factor `P(n, a, b; X)` is
//!   `∂_u^b ∂_v^{a-b} ∂_z^{n-a} |X - y|^{-λ}` taken with respect to the
//!   source position `y` at `y = 0`.
//!
//! so that `|X - y|^{-λ} = Σ C(n, a, b) y^{(n, a, b)} P(n, a, b; X)`.

use super::config::ExpansionConfig;
use super::errors::{Result, SeriesError};
use super::gegenbauer::GegenbauerTable;
use super::table::CoefficientTable;
use crate::utils::math::{binomial, factorial, falling_factorial, pochhammer};
use log::debug;
use num_complex::Complex64;

/// Read-only tables shared by every expansion of one kernel and order limit
#[derive(Debug, Clone)]
pub struct SeriesExpansionAux {
    /// Exponent λ of the kernel
    power: f64,
    max_order: usize,
    multiplicative_constants: CoefficientTable<f64>,
    /// `k!` for `k` in `0..=2 * max_order`
    factorials: Vec<f64>,
    /// `(λ/2)_k` for `k` in `0..=2 * max_order`
    pochhammers: Vec<f64>,
}

impl SeriesExpansionAux {
    /// Build the tables for kernel `|x - y|^{-power}` up to `max_order`
    ///
    /// Partial-derivative factors are available up to `2 * max_order`, which
    /// is what far-to-local translation needs.
    pub fn new(power: f64, max_order: usize) -> Result<Self> {
        ExpansionConfig::new(power, max_order).validate()?;

        debug!(
            "Building series expansion tables for power {} up to order {}",
            power, max_order
        );

        let derivative_order = 2 * max_order;
        let factorials = (0..=derivative_order).map(factorial).collect::<Vec<_>>();
        let pochhammers = (0..=derivative_order)
            .map(|k| pochhammer(0.5 * power, k))
            .collect();

        let mut multiplicative_constants = CoefficientTable::new(max_order);
        for n in 0..=max_order {
            for (a, b) in CoefficientTable::<f64>::triangle(n) {
                multiplicative_constants[(n, a, b)] =
                    1.0 / (factorials[b] * factorials[a - b] * factorials[n - a]);
            }
        }

        Ok(Self {
            power,
            max_order,
            multiplicative_constants,
            factorials,
            pochhammers,
        })
    }

    /// Build the tables described by a configuration
    pub fn from_config(config: &ExpansionConfig) -> Result<Self> {
        Self::new(config.power, config.max_order)
    }

    /// Highest expansion order supported
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Exponent λ of the kernel
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Table of `C(n, a, b)`
    pub fn multiplicative_constants(&self) -> &CoefficientTable<f64> {
        &self.multiplicative_constants
    }

    /// Fill `table` with `C_r^{λ/2 + m}(cos_theta)` over its whole extent
    ///
    /// The caller decides the size: `(order + 1)` square for evaluation,
    /// `2 (order + 1)` square for far-to-local translation.
    pub fn gegenbauer_polynomials(&self, cos_theta: f64, table: &mut GegenbauerTable) {
        table.fill(0.5 * self.power, cos_theta);
    }

    /// Partial-derivative factor `P(n, a, b)` at the spherical point
    /// `(radius, theta, phi)`
    ///
    /// `table` must have been filled by [`Self::gegenbauer_polynomials`] for
    /// `cos(theta)` and hold at least `a + 1` rows and `n - a + 1` columns.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_partial_derivative_factor(
        &self,
        n: usize,
        a: usize,
        b: usize,
        radius: f64,
        theta: f64,
        phi: f64,
        table: &GegenbauerTable,
    ) -> Result<Complex64> {
        if b > a || a > n {
            return Err(SeriesError::IndexOutOfRange { n, a, b });
        }
        if n >= self.factorials.len() {
            return Err(SeriesError::OrderTooHigh {
                order: n,
                max: self.factorials.len() - 1,
            });
        }
        if table.rows() <= a || table.cols() <= n - a {
            return Err(SeriesError::GegenbauerTableTooSmall {
                rows: table.rows(),
                cols: table.cols(),
                needed_rows: a + 1,
                needed_cols: n - a + 1,
            });
        }
        if radius.is_nan() || radius <= 0.0 {
            return Err(SeriesError::DegenerateGeometry(format!(
                "kernel derivative requested at radius {}",
                radius
            )));
        }

        let u_order = b;
        let v_order = a - b;
        let z_order = n - a;
        let sin_theta = theta.sin();

        // Leibniz expansion of the mixed u/v derivative; every term then
        // carries a z-derivative of |X|^{-λ - 2(a - j)}, which is a
        // Gegenbauer polynomial of shifted parameter.
        let mut angular = 0.0;
        for j in 0..=u_order.min(v_order) {
            let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
            angular += sign
                * binomial(u_order, j)
                * falling_factorial(v_order, j)
                * self.pochhammers[a - j]
                * self.factorials[z_order]
                * table.get(a - j, z_order)
                * sin_theta.powi((a - 2 * j) as i32);
        }

        let radial = radius.powf(-self.power - n as f64);
        let azimuthal = Complex64::from_polar(1.0, (a as f64 - 2.0 * b as f64) * phi);

        Ok(azimuthal * (radial * angular))
    }
}
