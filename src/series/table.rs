/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Per-order lower-triangular storage indexed by `(n, a, b)`

use std::ops::{Index, IndexMut};

/// One lower triangle `0 <= b <= a <= n` for every order `n` in `0..=max_order`
///
/// Triangles are stored packed, row by row. Index validity is checked in
/// debug builds only.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable<T> {
    max_order: usize,
    orders: Vec<Vec<T>>,
}

/// Number of entries in the triangle of order `n`
fn triangle_len(n: usize) -> usize {
    (n + 1) * (n + 2) / 2
}

/// Position of `(a, b)` inside a packed triangle
fn packed_index(a: usize, b: usize) -> usize {
    a * (a + 1) / 2 + b
}

impl<T: Copy + Default> CoefficientTable<T> {
    /// Create a table with every entry set to `T::default()`
    pub fn new(max_order: usize) -> Self {
        let orders = (0..=max_order)
            .map(|n| vec![T::default(); triangle_len(n)])
            .collect();
        Self { max_order, orders }
    }

    /// Entry `(n, a, b)`
    pub fn get(&self, n: usize, a: usize, b: usize) -> T {
        self[(n, a, b)]
    }
}

impl<T> CoefficientTable<T> {
    /// Highest order the table can hold
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Packed triangle of order `n`
    pub fn order(&self, n: usize) -> &[T] {
        &self.orders[n]
    }

    /// Mutable packed triangle of order `n`
    pub fn order_mut(&mut self, n: usize) -> &mut [T] {
        &mut self.orders[n]
    }

    /// All `(a, b)` pairs of the triangle of order `n`, in storage order
    pub fn triangle(n: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..=n).flat_map(|a| (0..=a).map(move |b| (a, b)))
    }
}

impl<T> Index<(usize, usize, usize)> for CoefficientTable<T> {
    type Output = T;

    fn index(&self, (n, a, b): (usize, usize, usize)) -> &T {
        debug_assert!(
            n <= self.max_order && a <= n && b <= a,
            "index ({}, {}, {}) outside triangle table of max order {}",
            n,
            a,
            b,
            self.max_order
        );
        &self.orders[n][packed_index(a, b)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for CoefficientTable<T> {
    fn index_mut(&mut self, (n, a, b): (usize, usize, usize)) -> &mut T {
        debug_assert!(
            n <= self.max_order && a <= n && b <= a,
            "index ({}, {}, {}) outside triangle table of max order {}",
            n,
            a,
            b,
            self.max_order
        );
        &mut self.orders[n][packed_index(a, b)]
    }
}
