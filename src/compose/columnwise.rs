//! Columnwise application of a single transformer to multivariate series

use super::check_columns;
use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use crate::transformer::Transformer;
use polars::prelude::*;
use std::collections::HashMap;

/// Applies one transformer independently to each column of a frame.
///
/// Each target column is handled as a univariate series: at fit time one
/// unfitted clone of the wrapped transformer is fit per column, sharing no
/// state. Transform replaces each target column's values with its fitted
/// clone's output and leaves every other column untouched, so the output has
/// the same shape and column set as the input. Target columns default to all
/// columns seen at fit time.
///
/// Inverse transform mirrors transform and is only available when the
/// wrapped transformer supports it; update delegates to each column's fitted
/// clone.
///
/// # Examples
///
/// ```
/// use tscompose::compose::ColumnwiseTransformer;
/// use tscompose::series::Detrender;
/// use tscompose::transformer::Transformer;
/// use polars::prelude::*;
///
/// let df = df!("x" => &[1.0, 2.0, 3.0], "y" => &[2.0, 4.0, 6.0]).unwrap();
/// let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
/// let out = columnwise.fit_transform(&df, None).unwrap();
/// assert_eq!(out.shape(), df.shape());
/// ```
pub struct ColumnwiseTransformer {
    transformer: Box<dyn Transformer>,
    columns: Option<Vec<String>>,
    tags: Tags,
    fitted_columns: Vec<String>,
    fitted: HashMap<String, Box<dyn Transformer>>,
    is_fitted: bool,
}

// A clone is an unfitted copy of the configuration; the wrapped transformer
// clones unfitted through `Box<dyn Transformer>`, so fitted state is never
// duplicated.
impl Clone for ColumnwiseTransformer {
    fn clone(&self) -> Self {
        Self {
            transformer: self.transformer.clone(),
            columns: self.columns.clone(),
            tags: self.tags,
            fitted_columns: Vec::new(),
            fitted: HashMap::new(),
            is_fitted: false,
        }
    }
}

impl ColumnwiseTransformer {
    /// Wrap a transformer; all columns seen at fit time become targets.
    ///
    /// The wrapper's capability record is copied from the wrapped
    /// transformer.
    pub fn new(transformer: Box<dyn Transformer>) -> Self {
        let tags = transformer.tags();
        Self {
            transformer,
            columns: None,
            tags,
            fitted_columns: Vec::new(),
            fitted: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Restrict the transformation to these columns; the rest pass through.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Target column labels resolved at fit time, in input column order
    pub fn fitted_columns(&self) -> &[String] {
        &self.fitted_columns
    }

    fn check_fitted(&self) -> Result<()> {
        if self.is_fitted {
            Ok(())
        } else {
            Err(ComposeError::NotFitted)
        }
    }

    /// Rebuild the frame column by column, sending each target column
    /// through `apply` and carrying the rest over untouched.
    fn map_columns<F>(&self, x: &DataFrame, apply: F) -> Result<DataFrame>
    where
        F: Fn(&dyn Transformer, &DataFrame) -> Result<DataFrame>,
    {
        check_columns(x, &self.fitted_columns)?;

        let mut out: Vec<Column> = Vec::with_capacity(x.width());
        for col in x.get_columns() {
            let name = col.name().to_string();
            match self.fitted.get(&name) {
                Some(child) => {
                    let single = x.select([name.as_str()])?;
                    let transformed = apply(child.as_ref(), &single)?;
                    let replaced = transformed.get_columns().first().cloned().ok_or_else(|| {
                        ComposeError::Data(format!(
                            "transformer produced no output for column {name}"
                        ))
                    })?;
                    out.push(replaced.with_name(name.into()));
                }
                None => out.push(col.clone()),
            }
        }

        Ok(DataFrame::new(out)?)
    }
}

impl Transformer for ColumnwiseTransformer {
    fn fit(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<()> {
        let targets: Vec<String> = match &self.columns {
            Some(columns) => columns.clone(),
            None => x
                .get_column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
        };
        check_columns(x, &targets)?;

        let mut fitted = HashMap::with_capacity(targets.len());
        for column in &targets {
            let mut child = self.transformer.clone_boxed();
            let single = x.select([column.as_str()])?;
            child.fit(&single, y)?;
            fitted.insert(column.clone(), child);
        }

        tracing::debug!(columns = targets.len(), "fitted columnwise transformer");
        self.fitted_columns = targets;
        self.fitted = fitted;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        self.check_fitted()?;
        self.map_columns(x, |child, single| child.transform(single))
    }

    fn inverse_transform(&self, x: &DataFrame) -> Result<DataFrame> {
        self.check_fitted()?;
        if !self.tags.supports_inverse_transform {
            return Err(ComposeError::NotSupported(
                "inverse_transform: wrapped transformer has no inverse".to_string(),
            ));
        }
        self.map_columns(x, |child, single| child.inverse_transform(single))
    }

    fn update(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<()> {
        self.check_fitted()?;
        check_columns(x, &self.fitted_columns)?;

        for column in &self.fitted_columns {
            let single = x.select([column.as_str()])?;
            if let Some(child) = self.fitted.get_mut(column) {
                child.update(&single, y)?;
            }
        }
        Ok(())
    }

    fn tags(&self) -> Tags {
        self.tags
    }

    fn clone_boxed(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Detrender;
    use crate::transformer::Id;

    fn sample_df() -> DataFrame {
        df!(
            "x" => &[1.0, 2.0, 4.0],
            "y" => &[10.0, 20.0, 40.0],
        )
        .unwrap()
    }

    #[test]
    fn test_default_columns_fit_one_clone_per_column() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
        columnwise.fit(&df, None).unwrap();

        assert_eq!(columnwise.fitted_columns(), &["x", "y"]);
        assert_eq!(columnwise.fitted.len(), 2);
    }

    #[test]
    fn test_untargeted_columns_pass_through() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()))
            .with_columns(vec!["x".to_string()]);

        let out = columnwise.fit_transform(&df, None).unwrap();
        assert_eq!(out.shape(), df.shape());
        assert!(out
            .column("y")
            .unwrap()
            .as_materialized_series()
            .equals(df.column("y").unwrap().as_materialized_series()));
    }

    #[test]
    fn test_fit_fails_naming_missing_columns() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Id::new()))
            .with_columns(vec!["x".to_string(), "z".to_string()]);

        let err = columnwise.fit(&df, None).unwrap_err();
        assert!(err.to_string().contains('z'));
        assert!(!err.to_string().contains('x'));
    }

    #[test]
    fn test_transform_fails_on_dropped_column() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
        columnwise.fit(&df, None).unwrap();

        let narrower = df!("x" => &[1.0, 2.0, 4.0]).unwrap();
        let err = columnwise.transform(&narrower).unwrap_err();
        assert!(matches!(err, ComposeError::MissingColumns { .. }));
        assert!(err.to_string().contains('y'));
    }

    #[test]
    fn test_clone_of_fitted_is_unfitted_config_copy() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
        columnwise.fit(&df, None).unwrap();

        let mut copy = columnwise.clone();
        assert!(matches!(
            copy.transform(&df),
            Err(ComposeError::NotFitted)
        ));

        // the copy keeps the configuration and can be fit independently
        copy.fit(&df, None).unwrap();
        assert_eq!(copy.fitted_columns(), columnwise.fitted_columns());
    }

    #[test]
    fn test_update_refreshes_each_column() {
        let df = sample_df();
        let mut columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
        columnwise.fit(&df, None).unwrap();

        let newer = df!(
            "x" => &[5.0, 6.0, 7.0],
            "y" => &[50.0, 60.0, 70.0],
        )
        .unwrap();
        columnwise.update(&newer, None).unwrap();

        // after update on the new window, transform of that window is detrended
        let out = columnwise.transform(&newer).unwrap();
        let x = out.column("x").unwrap().f64().unwrap();
        assert!(x.into_iter().all(|v| v.unwrap().abs() < 1e-9));
    }

    #[test]
    fn test_tags_copied_from_child() {
        let columnwise = ColumnwiseTransformer::new(Box::new(Detrender::new()));
        assert_eq!(columnwise.tags(), Detrender::new().tags());
    }
}
