//! # Linear Regression
//!
//! Ordinary least squares on `f32` data. The coefficients come either from the
//! normal equations `XᵗX·β = Xᵗy` (pivoted LU) or from the pseudo-inverse
//! `β = X⁺·y`, which also copes with collinear features.

use anyhow::{bail, Context};
use log::debug;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::solve::{pseudo_inverse, solve};
use crate::utils::Tolerances;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solver {
    #[default]
    NormalEquations,
    PseudoInverse,
}

pub struct LinearRegressionBuilder {
    fit_intercept: bool,
    solver: Solver,
    tolerances: Tolerances,
}

impl Default for LinearRegressionBuilder {
    fn default() -> Self {
        LinearRegressionBuilder {
            fit_intercept: true,
            solver: Solver::default(),
            tolerances: Tolerances::default(),
        }
    }
}

impl LinearRegressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn build(self) -> LinearRegression {
        LinearRegression {
            fit_intercept: self.fit_intercept,
            solver: self.solver,
            tolerances: self.tolerances,
            coefficients: None,
            intercept: 0.0,
        }
    }
}

/// Least-squares fit of `y ≈ X·β + b` for a samples × features matrix `X`.
pub struct LinearRegression {
    fit_intercept: bool,
    solver: Solver,
    tolerances: Tolerances,
    coefficients: Option<Array1<f32>>,
    intercept: f32,
}

impl LinearRegression {
    pub fn fit(&mut self, x: ArrayView2<f32>, y: ArrayView1<f32>) -> anyhow::Result<()> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_features == 0 {
            bail!("Cannot fit a regression on an empty design matrix");
        }
        if y.len() != n_samples {
            bail!(
                "Target has {} values but the design matrix has {} samples",
                y.len(),
                n_samples
            );
        }

        let design = if self.fit_intercept {
            let mut design = Array2::ones((n_samples, n_features + 1));
            design.slice_mut(s![.., 1..]).assign(&x);
            design
        } else {
            x.to_owned()
        };

        let beta = match self.solver {
            Solver::NormalEquations => {
                let gram = design.t().dot(&design);
                let rhs = design.t().dot(&y);
                solve(gram.view(), &rhs, &self.tolerances)
                    .context("Normal equations are singular; try Solver::PseudoInverse")?
            }
            Solver::PseudoInverse => pseudo_inverse(design.view(), &self.tolerances)
                .context("Pseudo-inverse of the design matrix failed")?
                .dot(&y),
        };

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(beta.slice(s![1..]).to_owned());
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }

        debug!(
            "Linear regression fitted on {} samples x {} features with {:?}",
            n_samples, n_features, self.solver
        );
        Ok(())
    }

    pub fn predict(&self, x: ArrayView2<f32>) -> anyhow::Result<Array1<f32>> {
        let coefficients = match &self.coefficients {
            Some(coefficients) => coefficients,
            None => bail!("Linear regression has not been fitted yet"),
        };
        if x.ncols() != coefficients.len() {
            bail!(
                "Input has {} features but the model was fitted on {}",
                x.ncols(),
                coefficients.len()
            );
        }
        Ok(x.dot(coefficients) + self.intercept)
    }

    pub fn coefficients(&self) -> Option<&Array1<f32>> {
        self.coefficients.as_ref()
    }

    /// Zero when the intercept is disabled or the model is unfitted.
    pub fn intercept(&self) -> f32 {
        self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_logger, random_matrix};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Axis};

    fn plane_data() -> (Array2<f32>, Array1<f32>) {
        let x = random_matrix(30, 2, 21);
        let y = x.map_axis(Axis(1), |row| 2.0 * row[0] - 3.0 * row[1] + 1.0);
        (x, y)
    }

    #[test]
    fn test_fit_recovers_plane_with_both_solvers() {
        init_logger();
        let (x, y) = plane_data();
        for solver in [Solver::NormalEquations, Solver::PseudoInverse] {
            let mut model = LinearRegressionBuilder::new().solver(solver).build();
            model.fit(x.view(), y.view()).unwrap();

            let coefficients = model.coefficients().unwrap();
            assert_abs_diff_eq!(coefficients[0], 2.0, epsilon = 1e-3);
            assert_abs_diff_eq!(coefficients[1], -3.0, epsilon = 1e-3);
            assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-3);

            let predicted = model.predict(x.view()).unwrap();
            for (p, t) in predicted.iter().zip(y.iter()) {
                assert_abs_diff_eq!(*p, *t, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_fit_without_intercept() {
        let x = array![[1.0f32], [2.0], [3.0], [4.0]];
        let y = array![2.0f32, 4.0, 6.0, 8.0];
        let mut model = LinearRegressionBuilder::new().fit_intercept(false).build();
        model.fit(x.view(), y.view()).unwrap();
        assert_abs_diff_eq!(model.coefficients().unwrap()[0], 2.0, epsilon = 1e-4);
        assert_eq!(model.intercept(), 0.0);
    }

    #[test]
    fn test_collinear_features() {
        // Second feature duplicates the first.
        let x = array![[1.0f32, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![3.0f32, 5.0, 7.0, 9.0];

        let mut pinv = LinearRegressionBuilder::new()
            .solver(Solver::PseudoInverse)
            .build();
        pinv.fit(x.view(), y.view()).unwrap();
        let predicted = pinv.predict(x.view()).unwrap();
        for (p, t) in predicted.iter().zip(y.iter()) {
            assert_abs_diff_eq!(*p, *t, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let (x, y) = plane_data();
        let mut model = LinearRegressionBuilder::new().build();
        assert!(model.predict(x.view()).is_err());
        assert!(model.fit(x.view(), y.slice(s![..10])).is_err());

        model.fit(x.view(), y.view()).unwrap();
        assert!(model.predict(random_matrix(3, 4, 2).view()).is_err());
    }
}
