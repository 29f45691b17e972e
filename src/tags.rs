//! Capability tags declared by transformers
//!
//! Every transformer carries a fixed record of boolean capability flags.
//! Composite transformers derive their own record from their children via
//! explicit per-field combination rules, evaluated once at construction.

use serde::{Deserialize, Serialize};

/// Capability record declared by a transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    /// Fitting learns no state (transform is valid without fit)
    pub fit_is_empty: bool,
    /// Fitting requires auxiliary label data
    pub requires_y: bool,
    /// Transform output has the same row index as the input
    pub returns_same_index: bool,
    /// Transformer tolerates missing values in the input
    pub handles_missing_data: bool,
    /// Transformer accepts series of unequal length
    pub handles_unequal_length: bool,
    /// Transformer implements inverse_transform
    pub supports_inverse_transform: bool,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            fit_is_empty: false,
            requires_y: false,
            returns_same_index: true,
            handles_missing_data: false,
            handles_unequal_length: false,
            supports_inverse_transform: false,
        }
    }
}

impl Tags {
    /// Combine the tags of several child transformers into the record a
    /// composite over those children may claim.
    ///
    /// Per-field rules are conservative: a capability is only claimed if it
    /// holds for every child; a requirement is claimed if any child has it.
    pub fn combine<'a, I>(children: I) -> Tags
    where
        I: IntoIterator<Item = &'a Tags>,
    {
        let mut combined = Tags {
            fit_is_empty: true,
            requires_y: false,
            returns_same_index: true,
            handles_missing_data: true,
            handles_unequal_length: true,
            supports_inverse_transform: true,
        };

        for child in children {
            combined.fit_is_empty &= child.fit_is_empty;
            combined.requires_y |= child.requires_y;
            combined.returns_same_index &= child.returns_same_index;
            combined.handles_missing_data &= child.handles_missing_data;
            combined.handles_unequal_length &= child.handles_unequal_length;
            combined.supports_inverse_transform &= child.supports_inverse_transform;
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_requires_y_is_or() {
        let a = Tags {
            requires_y: true,
            ..Tags::default()
        };
        let b = Tags::default();

        let combined = Tags::combine([&a, &b]);
        assert!(combined.requires_y);
    }

    #[test]
    fn test_combine_capabilities_are_and() {
        let a = Tags {
            handles_missing_data: true,
            supports_inverse_transform: true,
            ..Tags::default()
        };
        let b = Tags {
            handles_missing_data: false,
            supports_inverse_transform: true,
            ..Tags::default()
        };

        let combined = Tags::combine([&a, &b]);
        assert!(!combined.handles_missing_data);
        assert!(combined.supports_inverse_transform);
    }

    #[test]
    fn test_combine_fit_is_empty() {
        let a = Tags {
            fit_is_empty: true,
            ..Tags::default()
        };
        let b = Tags {
            fit_is_empty: false,
            ..Tags::default()
        };

        assert!(Tags::combine([&a]).fit_is_empty);
        assert!(!Tags::combine([&a, &b]).fit_is_empty);
    }

    #[test]
    fn test_tags_serialize() {
        let tags = Tags::default();
        let json = serde_json::to_string(&tags).unwrap();
        assert!(json.contains("\"requires_y\":false"));
    }
}
