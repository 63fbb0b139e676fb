//! Per-class perception ranges.

use std::collections::BTreeMap;

use tickgrid_types::Range;

/// Class key that applies to every class without an entry of its own.
pub const ALL_CLASSES: &str = "*";

/// How far an agent perceives each class of entity.
///
/// Lookup falls back from the exact class name to [`ALL_CLASSES`]. A class
/// matching neither is invisible to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseCapability {
    ranges: BTreeMap<String, Range>,
}

impl SenseCapability {
    /// Perceive every class at any distance.
    pub fn everything() -> Self {
        Self::nothing().with(ALL_CLASSES, Range::Unbounded)
    }

    /// Perceive nothing but oneself.
    pub const fn nothing() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    /// Set the range for one class (or [`ALL_CLASSES`]).
    #[must_use]
    pub fn with(mut self, class_name: impl Into<String>, range: Range) -> Self {
        self.ranges.insert(class_name.into(), range);
        self
    }

    /// Range at which `class_name` is perceived, if at all.
    pub fn range_for(&self, class_name: &str) -> Option<Range> {
        self.ranges
            .get(class_name)
            .or_else(|| self.ranges.get(ALL_CLASSES))
            .copied()
    }
}

impl Default for SenseCapability {
    fn default() -> Self {
        Self::everything()
    }
}
