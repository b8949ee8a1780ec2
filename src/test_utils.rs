use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::frobenius_norm;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Matrix with entries drawn uniformly from `[-1, 1)`.
pub(crate) fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(-1.0f32..1.0))
}

/// Square matrix whose diagonal dominates every row, so no row exchange is needed.
pub(crate) fn diagonally_dominant(n: usize, seed: u64) -> Array2<f32> {
    let mut a = random_matrix(n, n, seed);
    for i in 0..n {
        a[[i, i]] = n as f32 + 1.0;
    }
    a
}

/// `BᵗB + n·I` with bitwise-symmetric entries.
pub(crate) fn random_spd(n: usize, seed: u64) -> Array2<f32> {
    let b = random_matrix(n, n, seed);
    let mut a = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let mut value: f32 = (0..n).map(|k| b[[k, i]] * b[[k, j]]).sum();
            if i == j {
                value += n as f32;
            }
            a[[i, j]] = value;
            a[[j, i]] = value;
        }
    }
    a
}

/// Symmetric matrix `H₂H₁·diag(spectrum)·H₁H₂` built from two Householder reflections.
pub(crate) fn symmetric_with_spectrum(spectrum: &[f32], seed: u64) -> Array2<f32> {
    let n = spectrum.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut q = Array2::<f32>::eye(n);
    for _ in 0..2 {
        let u = Array1::from_shape_fn(n, |_| rng.random_range(-1.0f32..1.0));
        let uu: f32 = u.dot(&u);
        let mut h = Array2::<f32>::eye(n);
        for i in 0..n {
            for j in 0..n {
                h[[i, j]] -= 2.0 * u[i] * u[j] / uu;
            }
        }
        q = q.dot(&h);
    }
    let mut a = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let value: f32 = (0..n).map(|k| q[[i, k]] * spectrum[k] * q[[j, k]]).sum();
            a[[i, j]] = value;
            a[[j, i]] = value;
        }
    }
    a
}

pub(crate) fn distance<S1, S2>(a: &ArrayBase<S1, Ix2>, b: &ArrayBase<S2, Ix2>) -> f32
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    frobenius_norm(&(a - b))
}
