//! Selection state: the per-trace store and the retained-region cache.

pub mod regions;
pub mod store;

pub use regions::{RegionCache, RetainedRegion};
pub use store::{merge_sets, CommitOutcome, SelectionSet, SelectionStore};

use egui::Modifiers;

/// How a gesture's candidates combine with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectMode {
    #[default]
    Replace,
    Add,
    Subtract,
}

impl SelectMode {
    /// `alt` subtracts (and wins over `shift`), `shift` adds.
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.alt {
            SelectMode::Subtract
        } else if modifiers.shift {
            SelectMode::Add
        } else {
            SelectMode::Replace
        }
    }
}
