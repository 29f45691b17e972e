//! Exponent transformer

use super::{array_to_column, column_to_array};
use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use crate::transformer::Transformer;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Raises every value to a fixed power; configuration-only, fit learns
/// nothing.
///
/// The inverse raises to the reciprocal power and is unavailable for power
/// zero. Fractional powers of negative values yield NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExponentTransformer {
    power: f64,
}

impl ExponentTransformer {
    /// Create a new exponent transformer
    pub fn new(power: f64) -> Self {
        Self { power }
    }

    fn map_power(&self, x: &DataFrame, power: f64) -> Result<DataFrame> {
        let mut out = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let values = column_to_array(col)?.mapv(|v| v.powf(power));
            out.push(array_to_column(col.name(), values));
        }
        Ok(DataFrame::new(out)?)
    }
}

impl Default for ExponentTransformer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Transformer for ExponentTransformer {
    fn fit(&mut self, _x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        self.map_power(x, self.power)
    }

    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if self.power == 0.0 {
            return Err(ComposeError::NotSupported(
                "inverse_transform: power 0 has no inverse".to_string(),
            ));
        }
        self.map_power(x, 1.0 / self.power)
    }

    fn update(&mut self, _x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        Ok(())
    }

    fn tags(&self) -> Tags {
        Tags {
            fit_is_empty: true,
            requires_y: false,
            returns_same_index: true,
            handles_missing_data: false,
            handles_unequal_length: true,
            supports_inverse_transform: self.power != 0.0,
        }
    }

    fn clone_boxed(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}
