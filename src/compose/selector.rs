//! Column selectors and their fit-time resolution

use crate::error::{ComposeError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Specification of a subset of table columns.
///
/// Selectors are resolved exactly once, at fit time, against the training
/// frame's column labels; the resolved label list is what composites store in
/// fitted state. `Position` selects by column position, `Label` by name, and
/// `Set` combines selectors in declaration order (duplicates are dropped,
/// first occurrence wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelector {
    /// Column at this position in the frame
    Position(usize),
    /// Column with this label
    Label(String),
    /// Ordered combination of selectors
    Set(Vec<ColumnSelector>),
}

impl ColumnSelector {
    /// Resolve this selector against a frame into a concrete label list.
    ///
    /// Fails with [`ComposeError::MissingColumns`] if a label is absent or a
    /// position is out of range.
    pub fn resolve(&self, df: &DataFrame) -> Result<Vec<String>> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut resolved = Vec::new();
        self.resolve_into(&names, &mut resolved)?;

        // drop duplicates, first occurrence wins
        let mut seen = std::collections::HashSet::new();
        resolved.retain(|c| seen.insert(c.clone()));
        Ok(resolved)
    }

    fn resolve_into(&self, names: &[String], out: &mut Vec<String>) -> Result<()> {
        match self {
            ColumnSelector::Label(label) => {
                if names.iter().any(|n| n == label) {
                    out.push(label.clone());
                    Ok(())
                } else {
                    Err(ComposeError::MissingColumns {
                        columns: vec![label.clone()],
                    })
                }
            }
            ColumnSelector::Position(pos) => match names.get(*pos) {
                Some(name) => {
                    out.push(name.clone());
                    Ok(())
                }
                None => Err(ComposeError::MissingColumns {
                    columns: vec![format!("position {pos}")],
                }),
            },
            ColumnSelector::Set(parts) => {
                for part in parts {
                    part.resolve_into(names, out)?;
                }
                Ok(())
            }
        }
    }
}

impl From<usize> for ColumnSelector {
    fn from(pos: usize) -> Self {
        ColumnSelector::Position(pos)
    }
}

impl From<&str> for ColumnSelector {
    fn from(label: &str) -> Self {
        ColumnSelector::Label(label.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(label: String) -> Self {
        ColumnSelector::Label(label)
    }
}

impl From<Vec<&str>> for ColumnSelector {
    fn from(labels: Vec<&str>) -> Self {
        ColumnSelector::Set(labels.into_iter().map(ColumnSelector::from).collect())
    }
}

impl From<Vec<usize>> for ColumnSelector {
    fn from(positions: Vec<usize>) -> Self {
        ColumnSelector::Set(positions.into_iter().map(ColumnSelector::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "a" => &[1.0, 2.0],
            "b" => &[3.0, 4.0],
            "c" => &[5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_label() {
        let df = sample_df();
        let resolved = ColumnSelector::from("b").resolve(&df).unwrap();
        assert_eq!(resolved, vec!["b".to_string()]);
    }

    #[test]
    fn test_resolve_position() {
        let df = sample_df();
        let resolved = ColumnSelector::from(2usize).resolve(&df).unwrap();
        assert_eq!(resolved, vec!["c".to_string()]);
    }

    #[test]
    fn test_resolve_mixed_set_dedupes() {
        let df = sample_df();
        let selector = ColumnSelector::Set(vec![
            ColumnSelector::from("a"),
            ColumnSelector::from(0usize),
            ColumnSelector::from("c"),
        ]);
        let resolved = selector.resolve(&df).unwrap();
        assert_eq!(resolved, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_resolve_missing_label_fails() {
        let df = sample_df();
        let err = ColumnSelector::from("nope").resolve(&df).unwrap_err();
        assert!(matches!(err, ComposeError::MissingColumns { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_resolve_out_of_range_position_fails() {
        let df = sample_df();
        let err = ColumnSelector::from(7usize).resolve(&df).unwrap_err();
        assert!(matches!(err, ComposeError::MissingColumns { .. }));
    }
}
