use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix1, Ix2};

use crate::error::{LinalgError, Result};
use crate::utils::{check_square, Real, Tolerances};

/// Doolittle factorization `A = L·U` without row exchanges.
///
/// `L` is unit lower triangular and `U` upper triangular. Without pivoting the
/// factorization only exists (numerically) for matrices whose leading pivots
/// stay away from zero, such as diagonally dominant ones; use
/// [`PartialPivLU`] for general matrices.
#[derive(Debug, Clone)]
pub struct LU<T: Real> {
    l: Array2<T>,
    u: Array2<T>,
}

impl<T: Real> LU<T> {
    /// Fails with [`LinalgError::Singular`] when a pivot that would divide a
    /// column of `L` falls below the zero threshold. The last pivot divides
    /// nothing, so a singular matrix can still factor with `U[n-1][n-1] ≈ 0`.
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        let n = check_square(&a)?;
        let zero = tolerances.zero::<T>();
        let mut l = Array2::<T>::eye(n);
        let mut u = Array2::<T>::zeros((n, n));

        for i in 0..n {
            for k in i..n {
                let sum: T = (0..i).map(|j| l[[i, j]] * u[[j, k]]).sum();
                u[[i, k]] = a[[i, k]] - sum;
            }

            if i + 1 < n && u[[i, i]].abs() < zero {
                return Err(LinalgError::Singular { pivot: i });
            }

            for k in i + 1..n {
                let sum: T = (0..i).map(|j| l[[k, j]] * u[[j, i]]).sum();
                l[[k, i]] = (a[[k, i]] - sum) / u[[i, i]];
            }
        }

        Ok(LU { l, u })
    }

    pub fn l(&self) -> &Array2<T> {
        &self.l
    }

    pub fn u(&self) -> &Array2<T> {
        &self.u
    }

    pub fn into_parts(self) -> (Array2<T>, Array2<T>) {
        (self.l, self.u)
    }

    pub fn determinant(&self) -> T {
        self.u.diag().iter().fold(T::one(), |acc, &x| acc * x)
    }

    pub fn reconstruct(&self) -> Array2<T> {
        self.l.dot(&self.u)
    }
}

/// LU factorization with partial pivoting, `P·A = L·U`.
///
/// Row `i` of `P·A` is row `permutation()[i]` of `A`. This is the primitive
/// that inversion, linear solves and determinants are derived from.
#[derive(Debug, Clone)]
pub struct PartialPivLU<T: Real> {
    l: Array2<T>,
    u: Array2<T>,
    permutation: Vec<usize>,
    sign: T,
    zero: T,
}

impl<T: Real> PartialPivLU<T> {
    /// Fails with [`LinalgError::Singular`] when the largest available pivot
    /// of some column is below the zero threshold.
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        let n = check_square(&a)?;
        let zero = tolerances.zero::<T>();
        let mut work = a.to_owned();
        let mut l = Array2::<T>::zeros((n, n));
        let mut permutation: Vec<usize> = (0..n).collect();
        let mut sign = T::one();

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|&x, &y| {
                    work[[x, k]]
                        .abs()
                        .partial_cmp(&work[[y, k]].abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(k);

            if work[[pivot_row, k]].abs() < zero {
                debug!("Pivoted LU found no usable pivot in column {}", k);
                return Err(LinalgError::Singular { pivot: k });
            }

            if pivot_row != k {
                swap_rows(&mut work, k, pivot_row);
                swap_rows(&mut l, k, pivot_row);
                permutation.swap(k, pivot_row);
                sign = -sign;
            }

            let pivot = work[[k, k]];
            for i in k + 1..n {
                let factor = work[[i, k]] / pivot;
                l[[i, k]] = factor;
                for j in k..n {
                    let update = factor * work[[k, j]];
                    work[[i, j]] -= update;
                }
            }
        }

        for i in 0..n {
            l[[i, i]] = T::one();
            for j in 0..i {
                work[[i, j]] = T::zero();
            }
        }

        Ok(PartialPivLU {
            l,
            u: work,
            permutation,
            sign,
            zero,
        })
    }

    pub fn l(&self) -> &Array2<T> {
        &self.l
    }

    pub fn u(&self) -> &Array2<T> {
        &self.u
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// `+1` for an even number of row exchanges, `-1` otherwise.
    pub fn sign(&self) -> T {
        self.sign
    }

    pub fn determinant(&self) -> T {
        self.u
            .diag()
            .iter()
            .fold(self.sign, |acc, &x| acc * x)
    }

    /// Solves `A·x = b` by forward substitution on `L` and back substitution on `U`.
    pub fn solve_vector<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix1>) -> Result<Array1<T>> {
        let n = self.u.nrows();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                context: "right-hand side length",
                expected: n,
                found: b.len(),
            });
        }

        let mut y = Array1::<T>::zeros(n);
        for i in 0..n {
            let sum: T = (0..i).map(|j| self.l[[i, j]] * y[j]).sum();
            y[i] = b[self.permutation[i]] - sum;
        }

        let mut x = Array1::<T>::zeros(n);
        for i in (0..n).rev() {
            let sum: T = (i + 1..n).map(|j| self.u[[i, j]] * x[j]).sum();
            let pivot = self.u[[i, i]];
            if pivot.abs() < self.zero {
                return Err(LinalgError::Singular { pivot: i });
            }
            x[i] = (y[i] - sum) / pivot;
        }

        Ok(x)
    }

    /// Solves `A·X = B` one column of `B` at a time.
    pub fn solve_matrix<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix2>) -> Result<Array2<T>> {
        let n = self.u.nrows();
        if b.nrows() != n {
            return Err(LinalgError::DimensionMismatch {
                context: "right-hand side rows",
                expected: n,
                found: b.nrows(),
            });
        }

        let mut x = Array2::<T>::zeros(b.raw_dim());
        for (j, column) in b.columns().into_iter().enumerate() {
            x.column_mut(j).assign(&self.solve_vector(&column)?);
        }
        Ok(x)
    }

    pub fn inverse(&self) -> Result<Array2<T>> {
        self.solve_matrix(&Array2::<T>::eye(self.u.nrows()))
    }

    /// `Pᵗ·L·U`, which equals the factored matrix.
    pub fn reconstruct(&self) -> Array2<T> {
        let lu = self.l.dot(&self.u);
        let mut a = Array2::<T>::zeros(lu.raw_dim());
        for (i, &row) in self.permutation.iter().enumerate() {
            a.row_mut(row).assign(&lu.row(i));
        }
        a
    }
}

fn swap_rows<T: Real>(a: &mut Array2<T>, x: usize, y: usize) {
    for j in 0..a.ncols() {
        a.swap([x, j], [y, j]);
    }
}
