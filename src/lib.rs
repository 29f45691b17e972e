//! tscompose - column-wise composition of time series transformers
//!
//! This crate provides composite wrappers over a fit/transform estimator
//! contract for tabular time series data:
//! - routing different transformers to different column subsets and
//!   concatenating the results
//! - applying one transformer independently to each column of a
//!   multivariate series
//!
//! # Modules
//!
//! ## Composition
//! - [`compose`] - `ColumnEnsembleTransformer`, `ColumnwiseTransformer`,
//!   column selectors, and output naming
//!
//! ## Estimator contract
//! - [`transformer`] - the `Transformer` trait and the identity transformer
//! - [`tags`] - capability tags and their combination rules
//!
//! ## Transformers
//! - [`series`] - differencing, detrending, exponent transforms
//!
//! ## Utilities
//! - [`error`] - error types

pub mod error;
pub mod tags;
pub mod transformer;

pub mod compose;
pub mod series;
