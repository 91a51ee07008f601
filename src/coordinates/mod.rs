/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Coordinate conversions used by the series expansions
//!
//! Offsets in the xy-plane are carried as a magnitude `rho` together with two
//! unit complex numbers `eta = e^{i phi}` and `xi = e^{-i phi}`. Integer powers
//! of `eta * rho` and `xi * rho` then reproduce `(dx + i dy)^k` and
//! `(dx - i dy)^k` without repeated trigonometric calls.

mod vector;

pub use vector::Vector3D;

use num_complex::Complex64;

/// Convert an xy-plane offset into `(rho, eta, xi)`
///
/// The zero-magnitude case is special-cased: both roots of unity are set to
/// `1 + 0i`, so that `rho^0 * eta^0 = 1` and every positive power vanishes
/// through `rho`, with no division by zero.
pub fn convert_to_complex_form(dx: f64, dy: f64) -> (f64, Complex64, Complex64) {
    let rho = dx.hypot(dy);

    if rho > 0.0 {
        let eta = Complex64::new(dx / rho, dy / rho);
        (rho, eta, eta.conj())
    } else {
        let one = Complex64::new(1.0, 0.0);
        (0.0, one, one)
    }
}

/// Convert a Cartesian offset into spherical `(radius, theta, phi)`
///
/// `theta` is measured from the +z axis and `phi` is the azimuth. A zero
/// offset maps to `(0, 0, 0)` instead of producing NaN.
pub fn convert_cartesian_to_spherical(dx: f64, dy: f64, dz: f64) -> (f64, f64, f64) {
    let radius = (dx * dx + dy * dy + dz * dz).sqrt();

    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }

    // Rounding can push the ratio just outside [-1, 1]
    let theta = (dz / radius).clamp(-1.0, 1.0).acos();
    let phi = dy.atan2(dx);
    (radius, theta, phi)
}

/// Integer power of a unit-magnitude complex number
///
/// Negative exponents use the conjugate, which is the inverse on the unit
/// circle, so no reciprocal is ever taken.
pub fn pow_with_root_of_unity(z: Complex64, k: i32) -> Complex64 {
    match k {
        0 => Complex64::new(1.0, 0.0),
        k if k > 0 => z.powu(k.unsigned_abs()),
        k => z.conj().powu(k.unsigned_abs()),
    }
}

/// `(rho * root)^k` for a non-negative exponent, the building block of every
/// monomial in the expansion basis
pub(crate) fn scaled_root_power(root: Complex64, rho: f64, k: usize) -> Complex64 {
    pow_with_root_of_unity(root, k as i32) * rho.powi(k as i32)
}
