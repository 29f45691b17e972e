//! Composite transformers: column routing and recombination
//!
//! Provides the two column-composition wrappers:
//! - [`ColumnEnsembleTransformer`] - different transformers on different
//!   column subsets, outputs concatenated side by side
//! - [`ColumnwiseTransformer`] - one transformer applied independently to
//!   each column, shape-preserving

mod column_ensemble;
mod columnwise;
mod naming;
mod selector;

pub use column_ensemble::{ColumnEnsembleTransformer, EnsembleSpec, FittedColumn, Remainder};
pub use columnwise::ColumnwiseTransformer;
pub use naming::{resolve_feature_names, FeatureNaming, FLAT_SEPARATOR};
pub use selector::ColumnSelector;

use crate::error::{ComposeError, Result};
use polars::prelude::*;
use std::collections::HashSet;

/// Check that every wanted column is present in the frame, reporting all
/// absent labels at once.
pub(crate) fn check_columns(df: &DataFrame, wanted: &[String]) -> Result<()> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.as_str())
        .collect();

    let missing: Vec<String> = wanted
        .iter()
        .filter(|c| !present.contains(c.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ComposeError::MissingColumns { columns: missing })
    }
}
