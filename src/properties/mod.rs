//! # Scalar Matrix Properties
//!
//! Determinant, trace, rank, condition number and Frobenius norm. Where more
//! than one numerical path exists the caller picks it explicitly through a
//! method enum; the `Default` variant is the primary path.

use log::debug;
use ndarray::{s, Array2, ArrayBase, ArrayView2, Data, Ix2};

use crate::decomposition::{PartialPivLU, SVD};
use crate::error::{LinalgError, Result};
use crate::solve::inverse;
use crate::utils::{check_not_empty, check_square, frobenius_norm, from_usize, Real, Tolerances};

/// Largest order for which a singular LU falls back to cofactor expansion.
pub const COFACTOR_FALLBACK_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeterminantMethod {
    /// Closed form up to 2×2, pivoted LU above. If LU finds no usable pivot,
    /// cofactor expansion takes over up to [`COFACTOR_FALLBACK_LIMIT`], and the
    /// determinant is 0 beyond it.
    #[default]
    Auto,
    /// Signed product of the pivoted LU diagonal; 0 when LU finds no usable pivot.
    Lu,
    /// Recursive Laplace expansion along the first row. `O(n!)`.
    Cofactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMethod {
    /// Singular values above the cutoff.
    #[default]
    Svd,
    /// Gaussian elimination with partial pivoting, counting usable pivots.
    Elimination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionNorm {
    /// `‖A‖_F·‖A⁻¹‖_F`
    #[default]
    Frobenius,
    /// `σ_max / σ_min`
    Spectral,
}

pub fn determinant<T: Real>(
    a: ArrayView2<T>,
    method: DeterminantMethod,
    tolerances: &Tolerances,
) -> Result<T> {
    let n = check_square(&a)?;
    match method {
        DeterminantMethod::Auto => match n {
            1 => Ok(a[[0, 0]]),
            2 => Ok(a[[0, 0]] * a[[1, 1]] - a[[0, 1]] * a[[1, 0]]),
            _ => match PartialPivLU::new(a, tolerances) {
                Ok(lu) => Ok(lu.determinant()),
                Err(LinalgError::Singular { pivot }) if n <= COFACTOR_FALLBACK_LIMIT => {
                    debug!(
                        "LU found no pivot in column {}, falling back to cofactor expansion",
                        pivot
                    );
                    Ok(cofactor_determinant(&a))
                }
                Err(LinalgError::Singular { .. }) => Ok(T::zero()),
                Err(e) => Err(e),
            },
        },
        DeterminantMethod::Lu => match PartialPivLU::new(a, tolerances) {
            Ok(lu) => Ok(lu.determinant()),
            Err(LinalgError::Singular { .. }) => Ok(T::zero()),
            Err(e) => Err(e),
        },
        DeterminantMethod::Cofactor => Ok(cofactor_determinant(&a)),
    }
}

fn cofactor_determinant<T: Real>(a: &ArrayView2<T>) -> T {
    let n = a.nrows();
    match n {
        1 => a[[0, 0]],
        2 => a[[0, 0]] * a[[1, 1]] - a[[0, 1]] * a[[1, 0]],
        _ => {
            let mut total = T::zero();
            let mut sign = T::one();
            for j in 0..n {
                let entry = a[[0, j]];
                if entry != T::zero() {
                    let minor = Array2::from_shape_fn((n - 1, n - 1), |(r, c)| {
                        a[[r + 1, if c < j { c } else { c + 1 }]]
                    });
                    total += sign * entry * cofactor_determinant(&minor.view());
                }
                sign = -sign;
            }
            total
        }
    }
}

pub fn trace<T: Real>(a: ArrayView2<T>) -> Result<T> {
    check_square(&a)?;
    Ok(a.diag().sum())
}

pub fn rank<T: Real>(
    a: ArrayView2<T>,
    method: RankMethod,
    tolerances: &Tolerances,
) -> Result<usize> {
    check_not_empty(&a)?;
    match method {
        RankMethod::Svd => Ok(SVD::new(a, tolerances)?.rank()),
        RankMethod::Elimination => Ok(elimination_rank(&a, tolerances)),
    }
}

/// Row echelon reduction with partial pivoting. A pivot counts when it exceeds
/// `max(zero_threshold, max|a_ij|·ε·max(M, N))`.
fn elimination_rank<T: Real>(a: &ArrayView2<T>, tolerances: &Tolerances) -> usize {
    let (m, n) = a.dim();
    let mut work = a.to_owned();
    let largest = a.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()));
    let threshold = tolerances
        .zero::<T>()
        .max(largest * T::epsilon() * from_usize::<T>(m.max(n)));

    let mut rank = 0;
    for col in 0..n {
        if rank == m {
            break;
        }
        let pivot_row = (rank..m)
            .max_by(|&x, &y| {
                work[[x, col]]
                    .abs()
                    .partial_cmp(&work[[y, col]].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(rank);
        if work[[pivot_row, col]].abs() <= threshold {
            continue;
        }

        for j in col..n {
            work.swap([rank, j], [pivot_row, j]);
        }
        let pivot_values = work.slice(s![rank, col..]).to_owned();
        for i in rank + 1..m {
            let factor = work[[i, col]] / pivot_values[0];
            let mut row = work.slice_mut(s![i, col..]);
            row.scaled_add(-factor, &pivot_values);
        }
        rank += 1;
    }
    rank
}

/// Condition number in the requested norm. Singular input yields the largest
/// finite value of `T` as an "infinite" sentinel.
pub fn condition_number<T: Real>(
    a: ArrayView2<T>,
    norm: ConditionNorm,
    tolerances: &Tolerances,
) -> Result<T> {
    check_square(&a)?;
    match norm {
        ConditionNorm::Frobenius => match inverse(a, tolerances) {
            Ok(inv) => Ok(frobenius_norm(&a) * frobenius_norm(&inv)),
            Err(LinalgError::Singular { .. }) => Ok(T::max_value()),
            Err(e) => Err(e),
        },
        ConditionNorm::Spectral => {
            let svd = SVD::new(a, tolerances)?;
            let s = svd.s();
            let smallest = s[s.len() - 1];
            if smallest <= svd.cutoff() {
                Ok(T::max_value())
            } else {
                Ok(s[0] / smallest)
            }
        }
    }
}

/// Scalar properties with the default [`Tolerances`] and default methods.
pub trait MatrixProperties<T: Real> {
    fn determinant(&self) -> Result<T>;

    fn trace(&self) -> Result<T>;

    fn rank(&self) -> Result<usize>;

    fn condition_number(&self) -> Result<T>;

    fn frobenius_norm(&self) -> T;
}

impl<T: Real, S: Data<Elem = T>> MatrixProperties<T> for ArrayBase<S, Ix2> {
    fn determinant(&self) -> Result<T> {
        determinant(self.view(), DeterminantMethod::default(), &Tolerances::default())
    }

    fn trace(&self) -> Result<T> {
        trace(self.view())
    }

    fn rank(&self) -> Result<usize> {
        rank(self.view(), RankMethod::default(), &Tolerances::default())
    }

    fn condition_number(&self) -> Result<T> {
        condition_number(self.view(), ConditionNorm::default(), &Tolerances::default())
    }

    fn frobenius_norm(&self) -> T {
        frobenius_norm(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{diagonally_dominant, random_matrix};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    #[test]
    fn test_two_by_two_scenario() {
        let a = array![[4.0f32, 2.0], [2.0, 3.0]];
        assert_abs_diff_eq!(a.determinant().unwrap(), 8.0, epsilon = 1e-6);
        assert_abs_diff_eq!(a.trace().unwrap(), 7.0, epsilon = 1e-6);
        assert_eq!(a.rank().unwrap(), 2);
    }

    #[test]
    fn test_lu_determinant_agrees_with_closed_form() {
        let tol = Tolerances::default();
        for seed in 0..20 {
            let a = diagonally_dominant(2, seed);
            let closed = determinant(a.view(), DeterminantMethod::Auto, &tol).unwrap();
            let lu = determinant(a.view(), DeterminantMethod::Lu, &tol).unwrap();
            assert_abs_diff_eq!(closed, lu, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_determinant_methods_agree() {
        let tol = Tolerances::default();
        for n in 3..=6 {
            let a = random_matrix(n, n, 1300 + n as u64);
            let lu = determinant(a.view(), DeterminantMethod::Lu, &tol).unwrap();
            let cofactor = determinant(a.view(), DeterminantMethod::Cofactor, &tol).unwrap();
            assert_abs_diff_eq!(lu, cofactor, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_determinant_known_values() {
        let a = array![[2.0f32, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]];
        assert_abs_diff_eq!(a.determinant().unwrap(), 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(array![[5.0f32]].determinant().unwrap(), 5.0);

        let permutation = array![[0.0f32, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        assert_abs_diff_eq!(permutation.determinant().unwrap(), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_singular_determinant_falls_back() {
        let a = array![[1.0f32, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]];
        assert_eq!(a.determinant().unwrap(), 0.0);
        let tol = Tolerances::default();
        assert_eq!(
            determinant(a.view(), DeterminantMethod::Lu, &tol).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_auto_falls_back_to_cofactor_expansion() {
        let tol = Tolerances::default();
        for n in 3..=COFACTOR_FALLBACK_LIMIT {
            // A repeated row makes pivoted LU hit an exactly zero pivot.
            let mut a = random_matrix(n, n, 1500 + n as u64);
            let first = a.row(0).to_owned();
            a.row_mut(n - 1).assign(&first);

            assert!(matches!(
                PartialPivLU::new(a.view(), &tol),
                Err(LinalgError::Singular { .. })
            ));
            let auto = determinant(a.view(), DeterminantMethod::Auto, &tol).unwrap();
            let cofactor = determinant(a.view(), DeterminantMethod::Cofactor, &tol).unwrap();
            assert_eq!(auto, cofactor, "n = {}", n);
            assert!(auto.abs() < 1e-3, "n = {}: {}", n, auto);
            assert_eq!(
                determinant(a.view(), DeterminantMethod::Lu, &tol).unwrap(),
                0.0
            );
        }
    }

    #[test]
    fn test_auto_singular_above_fallback_limit_is_zero() {
        let tol = Tolerances::default();
        let n = COFACTOR_FALLBACK_LIMIT + 1;
        let mut a = random_matrix(n, n, 1600);
        let second = a.row(1).to_owned();
        a.row_mut(4).assign(&second);
        assert_eq!(
            determinant(a.view(), DeterminantMethod::Auto, &tol),
            Ok(0.0)
        );
    }

    #[test]
    fn test_trace_requires_square() {
        assert!(Array2::<f32>::zeros((2, 3)).trace().is_err());
        assert!(Array2::<f32>::zeros((2, 3)).determinant().is_err());
    }

    #[test]
    fn test_rank_methods() {
        let tol = Tolerances::default();
        let full = diagonally_dominant(4, 5);
        let deficient = array![[1.0f32, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 0.0, 1.0]];
        let wide = array![[1.0f32, 0.0, 2.0, 1.0], [2.0, 0.0, 4.0, 2.0]];

        for method in [RankMethod::Svd, RankMethod::Elimination] {
            assert_eq!(rank(full.view(), method, &tol).unwrap(), 4);
            assert_eq!(rank(deficient.view(), method, &tol).unwrap(), 2);
            assert_eq!(rank(wide.view(), method, &tol).unwrap(), 1);
            assert_eq!(rank(Array2::<f32>::zeros((3, 3)).view(), method, &tol).unwrap(), 0);
        }
        assert!(rank(Array2::<f32>::zeros((0, 3)).view(), RankMethod::Svd, &tol).is_err());
    }

    #[test]
    fn test_condition_numbers() {
        let tol = Tolerances::default();
        let a = array![[2.0f32, 0.0], [0.0, 0.5]];
        // ‖A‖_F = √4.25, ‖A⁻¹‖_F = √4.25
        assert_relative_eq!(a.condition_number().unwrap(), 4.25, epsilon = 1e-5);
        assert_relative_eq!(
            condition_number(a.view(), ConditionNorm::Spectral, &tol).unwrap(),
            4.0,
            epsilon = 1e-4
        );

        let identity = Array2::<f32>::eye(3);
        assert_relative_eq!(identity.condition_number().unwrap(), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_condition_number_of_singular_is_max_value() {
        let tol = Tolerances::default();
        let a = array![[1.0f32, 2.0], [2.0, 4.0]];
        assert_eq!(a.condition_number().unwrap(), f32::MAX);
        assert_eq!(
            condition_number(a.view(), ConditionNorm::Spectral, &tol).unwrap(),
            f32::MAX
        );
        assert!(Array2::<f32>::zeros((2, 3)).condition_number().is_err());
    }

    #[test]
    fn test_small_exact_singular_values_count() {
        let tol = Tolerances::default();
        let a = array![[10.0f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.01]];
        assert_eq!(a.rank().unwrap(), 3);
        assert_eq!(rank(a.view(), RankMethod::Elimination, &tol).unwrap(), 3);

        let b = array![[1000.0f32, 0.0], [0.0, 0.5]];
        assert_eq!(b.rank().unwrap(), 2);
        assert_relative_eq!(
            condition_number(b.view(), ConditionNorm::Spectral, &tol).unwrap(),
            2000.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_frobenius_norm() {
        let a = array![[1.0f32, 2.0], [2.0, 4.0]];
        assert_relative_eq!(a.frobenius_norm(), 5.0);
    }
}
