//! Output column naming for concatenated transformer blocks
//!
//! A column ensemble concatenates the outputs of several transformer blocks;
//! each resulting column is identified by a (block name, original label)
//! pair. [`FeatureNaming`] controls how those pairs become the final column
//! labels. Resolution happens once, over the full output label set, after
//! all blocks are concatenated.

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator between block name and original label in flat naming
pub const FLAT_SEPARATOR: &str = "__";

/// How output columns of a column ensemble are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureNaming {
    /// `Original` when the original labels are globally unique, else `Flat`
    #[default]
    Auto,
    /// `"{block}__{label}"`
    Flat,
    /// Two-level label rendered as `"({block}, {label})"`
    MultiIndex,
    /// Labels as produced by the blocks; fails on duplicates
    Original,
}

impl FromStr for FeatureNaming {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(FeatureNaming::Auto),
            "flat" => Ok(FeatureNaming::Flat),
            "multiindex" => Ok(FeatureNaming::MultiIndex),
            "original" => Ok(FeatureNaming::Original),
            other => Err(ComposeError::Config(format!(
                "feature naming must be one of \"auto\", \"flat\", \"multiindex\", \
                 \"original\", got \"{other}\""
            ))),
        }
    }
}

/// Resolve final column labels for (block, label) pairs under a naming mode.
///
/// Deterministic: the same pairs in the same order always yield the same
/// labels. Fails with [`ComposeError::DuplicateNames`] when the chosen mode
/// still yields duplicate labels (e.g. `Original` with colliding block
/// outputs, or `Flat` with a duplicate label inside one block).
pub fn resolve_feature_names(
    pairs: &[(String, String)],
    mode: FeatureNaming,
) -> Result<Vec<String>> {
    match mode {
        FeatureNaming::Original => {
            let labels: Vec<String> = pairs.iter().map(|(_, label)| label.clone()).collect();
            require_unique(labels)
        }
        FeatureNaming::Flat => require_unique(
            pairs
                .iter()
                .map(|(block, label)| format!("{block}{FLAT_SEPARATOR}{label}"))
                .collect(),
        ),
        FeatureNaming::MultiIndex => require_unique(
            pairs
                .iter()
                .map(|(block, label)| format!("({block}, {label})"))
                .collect(),
        ),
        FeatureNaming::Auto => {
            let labels: Vec<String> = pairs.iter().map(|(_, label)| label.clone()).collect();
            if duplicated(&labels).is_empty() {
                Ok(labels)
            } else {
                resolve_feature_names(pairs, FeatureNaming::Flat)
            }
        }
    }
}

fn require_unique(labels: Vec<String>) -> Result<Vec<String>> {
    let dups = duplicated(&labels);
    if dups.is_empty() {
        Ok(labels)
    } else {
        Err(ComposeError::DuplicateNames { names: dups })
    }
}

/// Labels occurring more than once, each reported once, in first-occurrence order
fn duplicated(labels: &[String]) -> Vec<String> {
    let mut counts = std::collections::HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0usize) += 1;
    }

    let mut dups = Vec::new();
    for label in labels {
        if counts.get(label.as_str()).copied().unwrap_or(0) > 1 && !dups.contains(label) {
            dups.push(label.clone());
        }
    }
    dups
}
