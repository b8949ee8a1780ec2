use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use ndarray::{Array1, ArrayBase, ArrayView2, Data, Ix1, Ix2, LinalgScalar, ScalarOperand};
use num_traits::{Float, FromPrimitive};

use crate::error::{LinalgError, Result};

/// Absolute threshold below which pivots, norms and singular values count as zero.
pub const ZERO_THRESHOLD: f64 = 1e-10;
/// Off-diagonal mass below which the QR eigen iteration is considered converged.
pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;
/// Iteration cap of the QR eigen iteration.
pub const MAX_EIGEN_ITERATIONS: usize = 100;

const SINGULAR_VALUE_NOISE_FACTOR: f64 = 64.0;

/// Scalar types every routine in this crate is generic over (`f32` and `f64`).
pub trait Real:
    Float
    + FromPrimitive
    + LinalgScalar
    + ScalarOperand
    + Sum
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> Real for T where
    T: Float
        + FromPrimitive
        + LinalgScalar
        + ScalarOperand
        + Sum
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Debug
        + Display
        + Send
        + Sync
{
}

/// Numerical thresholds shared by all decompositions.
///
/// The defaults are the crate-wide constants. Every free function in the crate
/// takes a `&Tolerances`; the extension traits use [`Tolerances::default`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub zero_threshold: f64,
    pub convergence_threshold: f64,
    pub max_iterations: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            zero_threshold: ZERO_THRESHOLD,
            convergence_threshold: CONVERGENCE_THRESHOLD,
            max_iterations: MAX_EIGEN_ITERATIONS,
        }
    }
}

impl Tolerances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zero_threshold(mut self, zero_threshold: f64) -> Self {
        self.zero_threshold = zero_threshold;
        self
    }

    pub fn convergence_threshold(mut self, convergence_threshold: f64) -> Self {
        self.convergence_threshold = convergence_threshold;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn zero<T: Real>(&self) -> T {
        cast(self.zero_threshold)
    }

    pub fn convergence<T: Real>(&self) -> T {
        cast(self.convergence_threshold)
    }

    /// Norm below which a Gram-Schmidt residual of a column with norm
    /// `reference` and length `len` is treated as exactly zero.
    pub fn degenerate_norm<T: Real>(&self, reference: T, len: usize) -> T {
        let relative = cast::<T>(8.0) * from_usize::<T>(len) * T::epsilon() * reference;
        self.zero::<T>().max(relative)
    }

    /// Singular values at or below this cutoff are treated as zero.
    ///
    /// Singular values are evaluated as `‖A·v_i‖`, whose rounding error is a
    /// small multiple of `ε·σ_max`, so the relative part is a noise floor of
    /// that size on top of the zero threshold.
    pub fn singular_value_cutoff<T: Real>(&self, sigma_max: T, rows: usize, cols: usize) -> T {
        let relative = cast::<T>(SINGULAR_VALUE_NOISE_FACTOR)
            * from_usize::<T>(rows.max(cols))
            * T::epsilon()
            * sigma_max;
        self.zero::<T>().max(relative)
    }
}

pub(crate) fn cast<T: Real>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::zero)
}

pub(crate) fn from_usize<T: Real>(value: usize) -> T {
    T::from_usize(value).unwrap_or_else(T::max_value)
}

pub(crate) fn check_not_empty<T, S: Data<Elem = T>>(a: &ArrayBase<S, Ix2>) -> Result<()> {
    if a.nrows() == 0 || a.ncols() == 0 {
        return Err(LinalgError::Empty);
    }
    Ok(())
}

/// Returns the order of a non-empty square matrix.
pub(crate) fn check_square<T, S: Data<Elem = T>>(a: &ArrayBase<S, Ix2>) -> Result<usize> {
    check_not_empty(a)?;
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

pub fn frobenius_norm<T: Real, S: Data<Elem = T>>(a: &ArrayBase<S, Ix2>) -> T {
    a.iter().map(|&x| x * x).sum::<T>().sqrt()
}

pub fn vector_norm<T: Real, S: Data<Elem = T>>(v: &ArrayBase<S, Ix1>) -> T {
    v.iter().map(|&x| x * x).sum::<T>().sqrt()
}

/// Scales `v` to unit length, failing on a (near) zero vector.
pub fn normalize<T: Real, S: Data<Elem = T>>(
    v: &ArrayBase<S, Ix1>,
    tolerances: &Tolerances,
) -> Result<Array1<T>> {
    if v.is_empty() {
        return Err(LinalgError::Empty);
    }
    let norm = vector_norm(v);
    if norm < tolerances.zero::<T>() {
        return Err(LinalgError::ZeroNorm);
    }
    Ok(v.mapv(|x| x / norm))
}

/// First `(row, col)` pair whose mirrored entries differ by at least `threshold`.
pub(crate) fn asymmetry<T: Real>(a: &ArrayView2<T>, threshold: T) -> Option<(usize, usize)> {
    let n = a.nrows();
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .find(|&(i, j)| (a[[i, j]] - a[[j, i]]).abs() >= threshold)
}

pub fn is_symmetric<T: Real, S: Data<Elem = T>>(a: &ArrayBase<S, Ix2>, threshold: T) -> bool {
    a.is_square() && asymmetry(&a.view(), threshold).is_none()
}

/// Sum of absolute values of all off-diagonal entries.
pub(crate) fn off_diagonal_sum<T: Real>(a: &ArrayView2<T>) -> T {
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, &x)| x.abs())
        .sum()
}

/// Indices that order `values` from largest to smallest.
pub(crate) fn descending_order<T: Real>(values: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}
