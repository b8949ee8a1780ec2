//! # Principal Component Analysis
//!
//! Dense PCA on `f32` data. The singular value decomposition is supplied by an
//! [`SvdBackend`]; [`GramSvd`] (the decomposition of [`crate::decomposition::SVD`])
//! is the default.

use anyhow::{anyhow, bail, Context};
use log::debug;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use std::sync::Arc;

use crate::decomposition::SVD;
use crate::utils::Tolerances;

/// Source of the thin SVD `(U, s, Vᵗ)` used to fit a [`Pca`].
pub trait SvdBackend: Send + Sync {
    fn compute(
        &self,
        matrix: ArrayView2<f32>,
    ) -> anyhow::Result<(Array2<f32>, Array1<f32>, Array2<f32>)>;
}

/// SVD through the eigendecomposition of the Gram matrix.
#[derive(Debug, Clone, Default)]
pub struct GramSvd {
    tolerances: Tolerances,
}

impl GramSvd {
    pub fn new(tolerances: Tolerances) -> Self {
        GramSvd { tolerances }
    }
}

impl SvdBackend for GramSvd {
    fn compute(
        &self,
        matrix: ArrayView2<f32>,
    ) -> anyhow::Result<(Array2<f32>, Array1<f32>, Array2<f32>)> {
        let svd = SVD::new(matrix, &self.tolerances).context("SVD computation failed")?;
        if !svd.converged() {
            debug!("Gram eigen iteration hit its cap; components are best effort");
        }
        Ok(svd.into_parts())
    }
}

pub struct PCABuilder<S: SvdBackend> {
    n_components: Option<usize>,
    center: bool,
    scale: bool,
    svd_backend: Arc<S>,
}

impl Default for PCABuilder<GramSvd> {
    fn default() -> Self {
        PCABuilder::new(GramSvd::default())
    }
}

impl<S: SvdBackend> PCABuilder<S> {
    pub fn new(svd_backend: S) -> Self {
        PCABuilder {
            n_components: None,
            center: true,
            scale: false,
            svd_backend: Arc::new(svd_backend),
        }
    }

    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = Some(n_components);
        self
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(self) -> Pca<S> {
        Pca {
            n_components: self.n_components,
            center: self.center,
            scale: self.scale,
            svd_backend: self.svd_backend,
            components: None,
            mean: None,
            std_dev: None,
            explained_variance_ratio: None,
            total_variance: None,
            eigenvalues: None,
        }
    }
}

/// Principal Component Analysis of a samples × features matrix.
///
/// Eigenvalues are the variances along each component, `s²/(n_samples - 1)`.
pub struct Pca<S: SvdBackend> {
    n_components: Option<usize>,
    center: bool,
    scale: bool,
    svd_backend: Arc<S>,
    components: Option<Array2<f32>>,
    mean: Option<Array1<f32>>,
    std_dev: Option<Array1<f32>>,
    explained_variance_ratio: Option<Array1<f32>>,
    total_variance: Option<f32>,
    eigenvalues: Option<Array1<f32>>,
}

impl<S: SvdBackend> Pca<S> {
    pub fn fit(&mut self, x: ArrayView2<f32>) -> anyhow::Result<()> {
        let (n_samples, n_features) = x.dim();
        if n_samples < 2 {
            bail!("PCA needs at least two samples, got {}", n_samples);
        }
        let max_components = n_samples.min(n_features);
        let n_components = self.n_components.unwrap_or(max_components);
        if n_components == 0 || n_components > max_components {
            bail!(
                "Number of components ({}) must be between 1 and {}",
                n_components,
                max_components
            );
        }

        let mean = if self.center {
            Some(
                x.mean_axis(Axis(0))
                    .ok_or_else(|| anyhow!("Failed to compute column means"))?,
            )
        } else {
            None
        };

        // Constant columns keep a unit scale instead of dividing by zero.
        let std_dev = if self.scale {
            Some(
                x.std_axis(Axis(0), 1.0)
                    .mapv(|sd| if sd > 0.0 { sd } else { 1.0 }),
            )
        } else {
            None
        };

        let x_preprocessed = preprocess(x, &mean, &std_dev);
        let (_u, s, vt) = self.svd_backend.compute(x_preprocessed.view())?;

        let components = vt.slice(s![..n_components, ..]).to_owned();
        let eigenvalues = s.mapv(|x| x * x / (n_samples as f32 - 1.0));
        let total_variance = eigenvalues.sum();
        let explained_variance_ratio = if total_variance > 0.0 {
            &eigenvalues / total_variance
        } else {
            Array1::zeros(eigenvalues.len())
        };

        debug!(
            "PCA fitted on {} samples x {} features, {} components explain {:.2}% of variance",
            n_samples,
            n_features,
            n_components,
            explained_variance_ratio.slice(s![..n_components]).sum() * 100.0
        );

        self.components = Some(components);
        self.mean = mean;
        self.std_dev = std_dev;
        self.explained_variance_ratio =
            Some(explained_variance_ratio.slice(s![..n_components]).to_owned());
        self.total_variance = Some(total_variance);
        self.eigenvalues = Some(eigenvalues.slice(s![..n_components]).to_owned());

        Ok(())
    }

    pub fn transform(&self, x: ArrayView2<f32>) -> anyhow::Result<Array2<f32>> {
        let components = self
            .components
            .as_ref()
            .ok_or_else(|| anyhow!("PCA has not been fitted yet"))?;
        if x.ncols() != components.ncols() {
            bail!(
                "Input has {} features but PCA was fitted on {}",
                x.ncols(),
                components.ncols()
            );
        }
        let x_preprocessed = preprocess(x, &self.mean, &self.std_dev);
        Ok(x_preprocessed.dot(&components.t()))
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f32>) -> anyhow::Result<Array2<f32>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Principal axes as rows (`n_components × n_features`).
    pub fn components(&self) -> Option<&Array2<f32>> {
        self.components.as_ref()
    }

    pub fn mean(&self) -> Option<&Array1<f32>> {
        self.mean.as_ref()
    }

    pub fn explained_variance_ratio(&self) -> Option<&Array1<f32>> {
        self.explained_variance_ratio.as_ref()
    }

    pub fn total_variance(&self) -> Option<f32> {
        self.total_variance
    }

    pub fn eigenvalues(&self) -> Option<&Array1<f32>> {
        self.eigenvalues.as_ref()
    }
}

fn preprocess(
    x: ArrayView2<f32>,
    mean: &Option<Array1<f32>>,
    std_dev: &Option<Array1<f32>>,
) -> Array2<f32> {
    let mut x_preprocessed = x.to_owned();

    if let Some(m) = mean {
        x_preprocessed -= m;
    }

    if let Some(s) = std_dev {
        x_preprocessed /= s;
    }

    x_preprocessed
}
