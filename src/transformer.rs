//! The transformer estimator contract
//!
//! A [`Transformer`] learns state from tabular data in `fit` and produces a
//! transformed frame of the same height in `transform`. Inverse transform and
//! incremental update are optional capabilities, declared via [`Tags`].

use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use polars::prelude::*;

/// Estimator contract for fittable column transformers.
///
/// Implementors operate on polars DataFrames with labeled columns. Auxiliary
/// label data `y`, when provided, is passed whole and is never sliced by
/// callers or composites.
pub trait Transformer {
    /// Fit the transformer to the data
    fn fit(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<()>;

    /// Transform the data, returning a new frame with the same height
    fn transform(&self, x: &DataFrame) -> Result<DataFrame>;

    /// Reverse the transformation.
    ///
    /// Only meaningful when `tags().supports_inverse_transform` is set; the
    /// default implementation refuses.
    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        let _ = x;
        Err(ComposeError::NotSupported(
            "inverse_transform".to_string(),
        ))
    }

    /// Update fitted state with new data.
    ///
    /// Semantics are owned by the implementor; the default refits on the new
    /// data, which is correct for any stateless or window-based transformer.
    fn update(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<()> {
        self.fit(x, y)
    }

    /// Fit and transform in one step
    fn fit_transform(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<DataFrame> {
        self.fit(x, y)?;
        self.transform(x)
    }

    /// Capability record of this transformer
    fn tags(&self) -> Tags;

    /// Fresh, unfitted copy of this transformer's configuration
    fn clone_boxed(&self) -> Box<dyn Transformer>;
}

impl Clone for Box<dyn Transformer> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Identity transformer: fit is a no-op, transform returns the input.
///
/// Used as the `passthrough` remainder of a column ensemble.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id;

impl Id {
    /// Create a new identity transformer
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for Id {
    fn fit(&mut self, _x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        Ok(x.clone())
    }

    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        Ok(x.clone())
    }

    fn update(&mut self, _x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        Ok(())
    }

    fn tags(&self) -> Tags {
        Tags {
            fit_is_empty: true,
            requires_y: false,
            returns_same_index: true,
            handles_missing_data: true,
            handles_unequal_length: true,
            supports_inverse_transform: true,
        }
    }

    fn clone_boxed(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0],
        )
        .unwrap();

        let mut id = Id::new();
        let out = id.fit_transform(&df, None).unwrap();
        assert!(out.equals(&df));

        let back = id.inverse_transform(&out).unwrap();
        assert!(back.equals(&df));
    }

    #[test]
    fn test_id_tags() {
        let tags = Id::new().tags();
        assert!(tags.fit_is_empty);
        assert!(tags.supports_inverse_transform);
    }

    #[test]
    fn test_boxed_clone_is_unfitted_copy() {
        let boxed: Box<dyn Transformer> = Box::new(Id::new());
        let cloned = boxed.clone();
        assert!(cloned.tags().fit_is_empty);
    }
}
