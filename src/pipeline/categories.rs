//! Waste categories and the model-index → category partition.
//!
//! The engine's output index space is partitioned into category spans.
//! The partition is deployment data, not code: retraining the model with a
//! different label layout only requires a new config file, never a rebuild.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The classification outcome for one deposited item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The model could not identify the item (or confidence was too low).
    Unrecognized,
    Hazardous,
    Recyclable,
    Kitchen,
    Other,
}

impl Category {
    /// Display label shown on the operator screen.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unrecognized => "unrecognized",
            Self::Hazardous => "hazardous",
            Self::Recyclable => "recyclable",
            Self::Kitchen => "kitchen",
            Self::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryMap
// ---------------------------------------------------------------------------

/// One contiguous span of model output indices mapping to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpan {
    /// First index of the span (inclusive).
    pub start: usize,
    /// One past the last index of the span.
    pub end: usize,
    pub category: Category,
}

/// Partition of the model's output index space into waste categories.
///
/// Lookup walks the spans in order and falls back to `fallback` for any
/// index no span covers, so the map stays valid when the model grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    spans: Vec<CategorySpan>,
    fallback: Category,
}

impl CategoryMap {
    pub fn new(spans: Vec<CategorySpan>, fallback: Category) -> Self {
        Self { spans, fallback }
    }

    /// Category for a model output index.
    pub fn category_for(&self, index: usize) -> Category {
        self.spans
            .iter()
            .find(|s| s.start <= index && index < s.end)
            .map_or(self.fallback, |s| s.category)
    }
}

impl Default for CategoryMap {
    /// Label layout of the deployed ten-class model: index 0 is the
    /// explicit reject class, then three indices per taxonomy group.
    fn default() -> Self {
        Self {
            spans: vec![
                CategorySpan {
                    start: 0,
                    end: 1,
                    category: Category::Unrecognized,
                },
                CategorySpan {
                    start: 1,
                    end: 4,
                    category: Category::Hazardous,
                },
                CategorySpan {
                    start: 4,
                    end: 7,
                    category: Category::Recyclable,
                },
                CategorySpan {
                    start: 7,
                    end: 10,
                    category: Category::Kitchen,
                },
            ],
            fallback: Category::Other,
        }
    }
}
