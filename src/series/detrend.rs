//! Linear detrending transformer

use super::{array_to_column, column_to_array};
use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use crate::transformer::Transformer;
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fitted trend line of one column
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TrendLine {
    intercept: f64,
    slope: f64,
}

impl TrendLine {
    fn at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64
    }
}

/// Removes a per-column linear trend.
///
/// Fit estimates an ordinary least-squares line over the row positions of
/// each column; transform subtracts it, inverse_transform adds it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detrender {
    trends: HashMap<String, TrendLine>,
    is_fitted: bool,
}

impl Detrender {
    /// Create a new detrender
    pub fn new() -> Self {
        Self::default()
    }

    fn fit_line(values: &Array1<f64>) -> Result<TrendLine> {
        let n = values.len();
        if n == 0 {
            return Err(ComposeError::Validation(
                "cannot fit a trend on an empty column".to_string(),
            ));
        }

        let t_mean = (n - 1) as f64 / 2.0;
        let v_mean = values.sum() / n as f64;

        let mut num = 0.0;
        let mut denom = 0.0;
        for (t, &v) in values.iter().enumerate() {
            let dt = t as f64 - t_mean;
            num += dt * (v - v_mean);
            denom += dt * dt;
        }

        // constant series: flat line through the mean
        let slope = if denom > 0.0 { num / denom } else { 0.0 };
        Ok(TrendLine {
            intercept: v_mean - slope * t_mean,
            slope,
        })
    }

    fn line_for(&self, name: &str) -> Result<&TrendLine> {
        self.trends.get(name).ok_or_else(|| {
            ComposeError::Validation(format!("no fitted trend for column {name}"))
        })
    }
}

impl Transformer for Detrender {
    fn fit(&mut self, x: &DataFrame, _y: Option<&DataFrame>) -> Result<()> {
        let mut trends = HashMap::new();
        for col in x.get_columns() {
            let values = column_to_array(col)?;
            trends.insert(col.name().to_string(), Self::fit_line(&values)?);
        }

        self.trends = trends;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ComposeError::NotFitted);
        }

        let mut out = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let line = self.line_for(col.name())?;
            let mut values = column_to_array(col)?;
            for (t, v) in values.iter_mut().enumerate() {
                *v -= line.at(t);
            }
            out.push(array_to_column(col.name(), values));
        }
        Ok(DataFrame::new(out)?)
    }

    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ComposeError::NotFitted);
        }

        let mut out = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let line = self.line_for(col.name())?;
            let mut values = column_to_array(col)?;
            for (t, v) in values.iter_mut().enumerate() {
                *v += line.at(t);
            }
            out.push(array_to_column(col.name(), values));
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
        Box::new(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_line_detrends_to_zero() {
        let df = df!("a" => &[2.0, 4.0, 6.0, 8.0]).unwrap();
        let mut detrender = Detrender::new();
        let out = detrender.fit_transform(&df, None).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        assert!(a.into_iter().all(|v| v.unwrap().abs() < 1e-9));
    }

    #[test]
    fn test_roundtrip() {
        let df = df!("a" => &[1.0, 5.0, 2.0, 8.0, 3.0]).unwrap();
        let mut detrender = Detrender::new();
        let transformed = detrender.fit_transform(&df, None).unwrap();
        let recovered = detrender.inverse_transform(&transformed).unwrap();

        let original = df.column("a").unwrap().f64().unwrap();
        let restored = recovered.column("a").unwrap().f64().unwrap();
        for (o, r) in original.into_iter().zip(restored.into_iter()) {
            assert!((o.unwrap() - r.unwrap()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_series_has_zero_slope() {
        let df = df!("a" => &[3.0, 3.0, 3.0]).unwrap();
        let mut detrender = Detrender::new();
        let out = detrender.fit_transform(&df, None).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        assert!(a.into_iter().all(|v| v.unwrap().abs() < 1e-9));
    }

    #[test]
    fn test_empty_column_fails() {
        let df = DataFrame::new(vec![Column::new("a".into(), Vec::<f64>::new())]).unwrap();
        let mut detrender = Detrender::new();
        let err = detrender.fit(&df, None).unwrap_err();
        assert!(matches!(err, ComposeError::Validation(_)));
    }
}
