/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Combinatorial helpers used by the series-expansion tables
//!
//! Everything here works in `f64`. Expansion orders are small (tens at most),
//! so direct products are accurate and avoid the overflow limits of integer
//! factorials.

/// Calculate n! as a floating-point number
///
/// # Arguments
///
/// * `n` - The non-negative integer for which to calculate the factorial
///
/// # Returns
///
/// The factorial of n. Overflows to infinity only beyond n = 170.
pub fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Falling factorial n! / (n - k)!
///
/// # Arguments
///
/// * `n` - The upper argument
/// * `k` - The number of factors (k ≤ n)
///
/// # Returns
///
/// The product n (n-1) ... (n-k+1), or 0 when k > n
pub fn falling_factorial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    ((n - k + 1)..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Binomial coefficient (n choose k)
///
/// # Arguments
///
/// * `n` - The total number of items
/// * `k` - The number of items to choose
///
/// # Returns
///
/// The binomial coefficient, 0 when k > n
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }

    // Use the symmetry of binomial coefficients
    let k = k.min(n - k);

    let mut result = 1.0;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result.round()
}

/// Pochhammer symbol (rising factorial) (x)_k = x (x+1) ... (x+k-1)
///
/// # Arguments
///
/// * `x` - The base value
/// * `k` - The number of factors
///
/// # Returns
///
/// The rising factorial, with (x)_0 = 1
pub fn pochhammer(x: f64, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (x + i as f64))
}
