//! Differencing transformer

use super::{array_to_column, column_to_array};
use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use crate::transformer::Transformer;
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order-n differencing, applied per column.
///
/// Output height equals input height: the first `order` values of each
/// differenced column are zero. Fit records per-column initial values so
/// `inverse_transform` reconstructs the training series exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Differencer {
    /// Order of differencing
    order: usize,
    /// Per-column reconstruction seeds, one per differencing pass
    initial: HashMap<String, Vec<f64>>,
    is_fitted: bool,
}

impl Differencer {
    /// Create a new differencer; order is clamped to at least 1
    pub fn new(order: usize) -> Self {
        Self {
            order: order.max(1),
            initial: HashMap::new(),
            is_fitted: false,
        }
    }

    fn diff_once(series: &Array1<f64>) -> Array1<f64> {
        let n = series.len();
        if n <= 1 {
            return Array1::zeros(0);
        }

        let mut result = Array1::zeros(n - 1);
        for i in 1..n {
            result[i - 1] = series[i] - series[i - 1];
        }
        result
    }

    fn cumsum(series: &Array1<f64>, init: f64) -> Array1<f64> {
        let n = series.len();
        let mut result = Array1::zeros(n + 1);
        result[0] = init;

        for i in 0..n {
            result[i + 1] = result[i] + series[i];
        }
        result
    }

    /// Difference one column, left-padding with zeros to keep the height
    fn diff_column(&self, values: &Array1<f64>) -> Result<Array1<f64>> {
        if values.len() <= self.order {
            return Err(ComposeError::Validation(format!(
                "series of length {} too short for order-{} differencing",
                values.len(),
                self.order
            )));
        }

        let mut current = values.clone();
        for _ in 0..self.order {
            current = Self::diff_once(&current);
        }

        let mut padded = Array1::zeros(values.len());
        for (i, &v) in current.iter().enumerate() {
            padded[self.order + i] = v;
        }
        Ok(padded)
    }
}

impl Default for Differencer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Transformer for Differencer {
    fn fit(&mut self, x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        let mut initial = HashMap::new();
        for col in x.get_columns() {
            let values = column_to_array(col)?;
            if values.len() <= self.order {
                return Err(ComposeError::Validation(format!(
                    "series of length {} too short for order-{} differencing",
                    values.len(),
                    self.order
                )));
            }

            // one seed per pass: the first element going into that pass
            let mut seeds = Vec::with_capacity(self.order);
            let mut current = values;
            for _ in 0..self.order {
                seeds.push(current[0]);
                current = Self::diff_once(&current);
            }
            initial.insert(col.name().to_string(), seeds);
        }

        self.initial = initial;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ComposeError::NotFitted);
        }

        let mut out = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let values = column_to_array(col)?;
            let diffed = self.diff_column(&values)?;
            out.push(array_to_column(col.name(), diffed));
        }
        Ok(DataFrame::new(out)?)
    }

    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ComposeError::NotFitted);
        }

        let mut out = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let seeds = self.initial.get(col.name().as_str()).ok_or_else(|| {
                ComposeError::Validation(format!(
                    "no differencing state for column {}",
                    col.name()
                ))
            })?;

            let values = column_to_array(col)?;
            if values.len() < self.order {
                return Err(ComposeError::Validation(format!(
                    "series of length {} shorter than differencing order {}",
                    values.len(),
                    self.order
                )));
            }

            // strip the zero padding, then undo each pass with its seed
            let mut current = values.slice(ndarray::s![self.order..]).to_owned();
            for k in (0..self.order).rev() {
                current = Self::cumsum(&current, seeds[k]);
            }
            out.push(array_to_column(col.name(), current));
        }
        Ok(DataFrame::new(out)?)
    }

    fn tags(&self) -> Tags {
        Tags {
            fit_is_empty: false,
            requires_y: false,
            returns_same_index: true,
            handles_missing_data: false,
            handles_unequal_length: false,
            supports_inverse_transform: true,
        }
    }

    fn clone_boxed(&self) -> Box<dyn Transformer> {
        Box::new(Self::new(self.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let df = df!("a" => &[1.0, 3.0, 6.0, 10.0, 15.0]).unwrap();
        let mut diff = Differencer::new(1);
        let out = diff.fit_transform(&df, None).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        let values: Vec<f64> = a.into_iter().map(|v| v.unwrap()).collect();
        assert_eq!(values, vec![0.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_roundtrip_order_two() {
        let df = df!("a" => &[1.0, 4.0, 9.0, 16.0, 25.0, 36.0]).unwrap();
        let mut diff = Differencer::new(2);
        let transformed = diff.fit_transform(&df, None).unwrap();
        let recovered = diff.inverse_transform(&transformed).unwrap();

        let original = df.column("a").unwrap().f64().unwrap();
        let restored = recovered.column("a").unwrap().f64().unwrap();
        for (o, r) in original.into_iter().zip(restored.into_iter()) {
            assert!((o.unwrap() - r.unwrap()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_too_short_series_fails() {
        let df = df!("a" => &[1.0, 2.0]).unwrap();
        let mut diff = Differencer::new(3);
        let err = diff.fit(&df, None).unwrap_err();
        assert!(matches!(err, ComposeError::Validation(_)));
    }

    #[test]
    fn test_inverse_unknown_column_fails() {
        let df = df!("a" => &[1.0, 2.0, 3.0]).unwrap();
        let mut diff = Differencer::new(1);
        diff.fit(&df, None).unwrap();

        let other = df!("b" => &[0.0, 1.0, 1.0]).unwrap();
        let err = diff.inverse_transform(&other).unwrap_err();
        assert!(err.to_string().contains('b'));
    }
}
