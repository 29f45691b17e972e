//! Column ensemble: different transformers on different column subsets

use super::naming::{resolve_feature_names, FeatureNaming};
use super::selector::ColumnSelector;
use super::check_columns;
use crate::error::{ComposeError, Result};
use crate::tags::Tags;
use crate::transformer::{Id, Transformer};
use polars::prelude::*;
use std::str::FromStr;

/// Block name reserved for the remainder triple
const REMAINDER_NAME: &str = "remainder";

/// Policy for input columns not claimed by any explicit selector
#[derive(Clone, Default)]
pub enum Remainder {
    /// Leftover columns are dropped from the output
    #[default]
    Drop,
    /// Leftover columns pass through unchanged, under the "remainder" block
    Passthrough,
    /// Leftover columns are transformed by this estimator
    Custom(Box<dyn Transformer>),
}

impl std::fmt::Debug for Remainder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Remainder::Drop => f.write_str("Drop"),
            Remainder::Passthrough => f.write_str("Passthrough"),
            Remainder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Remainder {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop" => Ok(Remainder::Drop),
            "passthrough" => Ok(Remainder::Passthrough),
            other => Err(ComposeError::Config(format!(
                "remainder must be \"drop\", \"passthrough\", or a transformer, \
                 got \"{other}\""
            ))),
        }
    }
}

/// What the ensemble applies: one broadcast transformer, or named triples
#[derive(Clone)]
pub enum EnsembleSpec {
    /// One clone of this transformer per input column; blocks named after
    /// their column
    Broadcast(Box<dyn Transformer>),
    /// Ordered (name, transformer, selector) triples
    Triples(Vec<(String, Box<dyn Transformer>, ColumnSelector)>),
}

/// One fitted block of a column ensemble
pub struct FittedColumn {
    /// Block name, tags this block's output columns
    pub name: String,
    /// Resolved column labels the block was fit on
    pub columns: Vec<String>,
    transformer: Box<dyn Transformer>,
}

impl FittedColumn {
    /// The fitted transformer of this block
    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer.as_ref()
    }
}

/// Applies different transformers to different column subsets of a frame and
/// concatenates the per-block outputs side by side.
///
/// Each block is a (name, transformer, column selector) triple. At fit time
/// selectors are resolved against the training frame, one unfitted clone of
/// each transformer is fit on its column slice, and the resolved triples are
/// stored in declaration order. Columns not claimed by any selector follow
/// the [`Remainder`] policy; an active remainder is appended as a final
/// synthetic `"remainder"` block. Output column labels are governed by
/// [`FeatureNaming`].
///
/// # Examples
///
/// ```
/// use tscompose::compose::ColumnEnsembleTransformer;
/// use tscompose::series::{Detrender, Differencer};
/// use tscompose::transformer::Transformer;
/// use polars::prelude::*;
///
/// let df = df!("a" => &[1.0, 2.0, 3.0], "b" => &[4.0, 5.0, 6.0]).unwrap();
/// let mut ensemble = ColumnEnsembleTransformer::new(vec![
///     ("d".to_string(), Box::new(Differencer::new(1)) as Box<dyn Transformer>, "a".into()),
///     ("t".to_string(), Box::new(Detrender::new()) as Box<dyn Transformer>, "b".into()),
/// ]).unwrap();
/// let out = ensemble.fit_transform(&df, None).unwrap();
/// assert_eq!(out.shape(), (3, 2));
/// ```
pub struct ColumnEnsembleTransformer {
    spec: EnsembleSpec,
    remainder: Remainder,
    feature_naming: FeatureNaming,
    tags: Tags,
    fitted: Vec<FittedColumn>,
    is_fitted: bool,
}

// A clone is an unfitted copy of the configuration; children clone unfitted
// through `Box<dyn Transformer>`, so fitted state is never duplicated.
impl Clone for ColumnEnsembleTransformer {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            remainder: self.remainder.clone(),
            feature_naming: self.feature_naming,
            tags: self.tags,
            fitted: Vec::new(),
            is_fitted: false,
        }
    }
}

impl ColumnEnsembleTransformer {
    /// Create an ensemble from an [`EnsembleSpec`].
    ///
    /// Triple names must be non-empty, unique, and not the reserved
    /// `"remainder"`.
    pub fn from_spec(spec: EnsembleSpec) -> Result<Self> {
        if let EnsembleSpec::Triples(triples) = &spec {
            let mut seen = std::collections::HashSet::new();
            for (name, _, _) in triples {
                if name.is_empty() {
                    return Err(ComposeError::Config(
                        "transformer names must be non-empty".to_string(),
                    ));
                }
                if name == REMAINDER_NAME {
                    return Err(ComposeError::Config(format!(
                        "transformer name \"{REMAINDER_NAME}\" is reserved"
                    )));
                }
                if !seen.insert(name.clone()) {
                    return Err(ComposeError::Config(format!(
                        "duplicate transformer name \"{name}\""
                    )));
                }
            }
        }

        let remainder = Remainder::Drop;
        let tags = Self::derive_tags(&spec, &remainder);
        Ok(Self {
            spec,
            remainder,
            feature_naming: FeatureNaming::Auto,
            tags,
            fitted: Vec::new(),
            is_fitted: false,
        })
    }

    /// Create an ensemble from named (name, transformer, selector) triples.
    ///
    /// Fails if a name is empty, duplicated, or the reserved `"remainder"`.
    pub fn new(
        triples: Vec<(String, Box<dyn Transformer>, ColumnSelector)>,
    ) -> Result<Self> {
        Self::from_spec(EnsembleSpec::Triples(triples))
    }

    /// Create an ensemble that applies clones of one transformer to every
    /// input column, one block per column.
    pub fn broadcast(transformer: Box<dyn Transformer>) -> Self {
        let spec = EnsembleSpec::Broadcast(transformer);
        let remainder = Remainder::Drop;
        let tags = Self::derive_tags(&spec, &remainder);
        Self {
            spec,
            remainder,
            feature_naming: FeatureNaming::Auto,
            tags,
            fitted: Vec::new(),
            is_fitted: false,
        }
    }

    /// Set the remainder policy
    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self.tags = Self::derive_tags(&self.spec, &self.remainder);
        self
    }

    /// Set the output naming mode
    pub fn with_feature_naming(mut self, naming: FeatureNaming) -> Self {
        self.feature_naming = naming;
        self
    }

    /// Fitted blocks in stored order; remainder block, if any, is last
    pub fn fitted(&self) -> &[FittedColumn] {
        &self.fitted
    }

    /// Aggregate capability record derived from the children
    fn derive_tags(spec: &EnsembleSpec, remainder: &Remainder) -> Tags {
        let mut child_tags = match spec {
            EnsembleSpec::Broadcast(t) => vec![t.tags()],
            EnsembleSpec::Triples(triples) => triples.iter().map(|(_, t, _)| t.tags()).collect(),
        };
        if let Remainder::Custom(t) = remainder {
            child_tags.push(t.tags());
        }
        Tags::combine(child_tags.iter())
    }

    /// Resolve the spec against the training frame into concrete triples,
    /// appending the synthetic remainder triple when active.
    fn resolve_spec(
        &self,
        x: &DataFrame,
    ) -> Result<Vec<(String, Box<dyn Transformer>, Vec<String>)>> {
        let all_columns: Vec<String> = x
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut resolved = Vec::new();
        match &self.spec {
            EnsembleSpec::Broadcast(transformer) => {
                for col in &all_columns {
                    resolved.push((col.clone(), transformer.clone(), vec![col.clone()]));
                }
            }
            EnsembleSpec::Triples(triples) => {
                for (name, transformer, selector) in triples {
                    let columns = selector.resolve(x)?;
                    resolved.push((name.clone(), transformer.clone(), columns));
                }
            }
        }

        let remainder_transformer: Option<Box<dyn Transformer>> = match &self.remainder {
            Remainder::Drop => None,
            Remainder::Passthrough => Some(Box::new(Id::new())),
            Remainder::Custom(t) => Some(t.clone()),
        };

        if let Some(transformer) = remainder_transformer {
            let claimed: std::collections::HashSet<&String> =
                resolved.iter().flat_map(|(_, _, cols)| cols).collect();
            // leftover columns keep original frame order
            let leftover: Vec<String> = all_columns
                .iter()
                .filter(|c| !claimed.contains(c))
                .cloned()
                .collect();
            resolved.push((REMAINDER_NAME.to_string(), transformer, leftover));
        }

        Ok(resolved)
    }
}

impl Transformer for ColumnEnsembleTransformer {
    fn fit(&mut self, x: &DataFrame, y: Option<&DataFrame>) -> Result<()> {
        let triples = self.resolve_spec(x)?;

        let mut fitted = Vec::with_capacity(triples.len());
        for (name, transformer, columns) in triples {
            // resolve_spec already handed out fresh unfitted clones
            let mut child = transformer;
            let slice = x.select(columns.iter().map(|s| s.as_str()))?;
            child.fit(&slice, y)?;
            fitted.push(FittedColumn {
                name,
                columns,
                transformer: child,
            });
        }

        tracing::debug!(blocks = fitted.len(), "fitted column ensemble");
        self.fitted = fitted;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ComposeError::NotFitted);
        }

        // one (block, label) pair per output column, in block order
        let mut pairs = Vec::new();
        let mut columns: Vec<Column> = Vec::new();
        for block in &self.fitted {
            check_columns(x, &block.columns)?;
            let slice = x.select(block.columns.iter().map(|s| s.as_str()))?;
            let out = block.transformer.transform(&slice)?;
            for col in out.get_columns() {
                pairs.push((block.name.clone(), col.name().to_string()));
                columns.push(col.clone());
            }
        }

        let names = resolve_feature_names(&pairs, self.feature_naming)?;
        let renamed: Vec<Column> = columns
            .into_iter()
            .zip(names)
            .map(|(col, name)| col.with_name(name.into()))
            .collect();

        Ok(DataFrame::new(renamed)?)
    }

    fn tags(&self) -> Tags {
        self.tags
    }

    fn clone_boxed(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}
