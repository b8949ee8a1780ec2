//! # Dimensionality Reduction
//!
//! Linear reducers built on the decompositions of this crate.
//!
//! ## Currently Available
//! - **PCA** ([`pca`]): Principal Component Analysis with a pluggable SVD backend

pub mod pca;
