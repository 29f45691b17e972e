//! Concrete series transformers
//!
//! Working vocabulary of the composition layer: differencing, linear
//! detrending, and exponent transforms. Each operates per column, preserves
//! the row count, and implements the [`Transformer`](crate::transformer::Transformer)
//! contract with accurate capability tags.

mod detrend;
mod difference;
mod exponent;

pub use detrend::Detrender;
pub use difference::Differencer;
pub use exponent::ExponentTransformer;

use crate::error::{ComposeError, Result};
use ndarray::Array1;
use polars::prelude::*;

/// Extract a column as a dense f64 array; nulls become NaN.
pub(crate) fn column_to_array(col: &Column) -> Result<Array1<f64>> {
    let series = col
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| ComposeError::Data(e.to_string()))?;
    let ca = series
        .f64()
        .map_err(|e| ComposeError::Data(e.to_string()))?;
    let values: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    Ok(Array1::from_vec(values))
}

/// Build a named column from an f64 array
pub(crate) fn array_to_column(name: &str, values: Array1<f64>) -> Column {
    Column::new(name.into(), values.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_array_roundtrip() {
        let col = Column::new("a".into(), &[1.0, 2.0, 3.0]);
        let arr = column_to_array(&col).unwrap();
        assert_eq!(arr.len(), 3);

        let back = array_to_column("a", arr);
        assert!(back
            .as_materialized_series()
            .equals(col.as_materialized_series()));
    }

    #[test]
    fn test_integer_column_is_cast() {
        let col = Column::new("a".into(), &[1i64, 2, 3]);
        let arr = column_to_array(&col).unwrap();
        assert!((arr[2] - 3.0).abs() < 1e-12);
    }
}
