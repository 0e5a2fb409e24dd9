//! Retained regions per subplot.
//!
//! The last committed region of a subplot outlives its gesture so that a
//! following modified (shift/alt) gesture on the same subplot can extend the
//! drawn boundary. Selection membership lives in the store; this cache only
//! carries geometry and outline visibility.

use std::collections::HashMap;

use egui::Pos2;
use tracing::debug;

use super::SelectMode;
use crate::coords::SubplotId;
use crate::geometry::Region;

#[derive(Debug, Clone, PartialEq)]
pub struct RetainedRegion {
    pub region: Region,
    pub mode: SelectMode,
}

#[derive(Debug, Clone, Default)]
struct SubplotRegions {
    regions: Vec<RetainedRegion>,
    outline_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RegionCache {
    subplots: HashMap<SubplotId, SubplotRegions>,
    last_subplot: Option<SubplotId>,
}

impl RegionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gesture extends the retained regions only when it carries a
    /// modifier and happens on the subplot of the previous gesture.
    pub fn should_merge(&self, subplot: &SubplotId, modified: bool) -> bool {
        modified
            && self.last_subplot.as_ref() == Some(subplot)
            && self.subplots.get(subplot).is_some_and(|s| !s.regions.is_empty())
    }

    pub fn regions(&self, subplot: &SubplotId) -> &[RetainedRegion] {
        self.subplots
            .get(subplot)
            .map(|s| s.regions.as_slice())
            .unwrap_or(&[])
    }

    pub fn commit(&mut self, subplot: &SubplotId, region: Region, mode: SelectMode, merge: bool) {
        let entry = self.subplots.entry(subplot.clone()).or_default();
        if !merge {
            entry.regions.clear();
        }
        entry.regions.push(RetainedRegion { region, mode });
        entry.outline_visible = true;
        self.last_subplot = Some(subplot.clone());
    }

    /// Outline polygons for an in-flight gesture: retained ones when
    /// merging, then the current region.
    pub fn preview_outline(&self, subplot: &SubplotId, current: &Region, merge: bool) -> Vec<Vec<Pos2>> {
        let mut out: Vec<Vec<Pos2>> = if merge {
            self.regions(subplot).iter().map(|r| r.region.outline()).collect()
        } else {
            Vec::new()
        };
        out.push(current.outline());
        out
    }

    /// Visible outline of a subplot.
    pub fn outline(&self, subplot: &SubplotId) -> Vec<Vec<Pos2>> {
        match self.subplots.get(subplot) {
            Some(s) if s.outline_visible => s.regions.iter().map(|r| r.region.outline()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn outline_visible(&self, subplot: &SubplotId) -> bool {
        self.subplots.get(subplot).is_some_and(|s| s.outline_visible && !s.regions.is_empty())
    }

    /// Hide every outline but keep the geometry (select ↔ lasso switch).
    pub fn hide_outlines(&mut self) {
        for s in self.subplots.values_mut() {
            s.outline_visible = false;
        }
    }

    /// Drop the regions of one subplot, or of all subplots for `None`.
    pub fn discard(&mut self, subplot: Option<&SubplotId>) {
        match subplot {
            Some(id) => {
                if self.subplots.remove(id).is_some() {
                    debug!(subplot = %id, "retained regions discarded");
                }
            }
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        if !self.subplots.is_empty() {
            debug!("all retained regions discarded");
        }
        self.subplots.clear();
        self.last_subplot = None;
    }
}
