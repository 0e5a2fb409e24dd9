//! Per-trace selection state.
//!
//! The store is the only writer of [`SelectionSet`]s. Gestures work on a
//! snapshot (`begin_selection`), feed candidates into it
//! (`apply_membership`) and finally `commit` or `discard` it.

use tracing::debug;

use super::SelectMode;
use crate::config::DimStyle;

/// Selected point indices of one trace, ascending and deduplicated.
/// `None` means no selection was ever made on the trace.
pub type SelectionSet = Option<Vec<usize>>;

/// What a commit did to the store as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    /// Any trace's set differs from before.
    pub changed: bool,
    /// Something was selected before and nothing is now.
    pub deselected: bool,
}

#[derive(Debug, Clone)]
struct Working {
    mode: SelectMode,
    traces: Vec<usize>,
    base: Vec<SelectionSet>,
    preview: Vec<SelectionSet>,
    /// Latest candidates per gesture trace, replayed when the base changes.
    candidates: Vec<Option<Vec<usize>>>,
}

impl Working {
    fn ensure_len(&mut self, n: usize) {
        if self.base.len() < n {
            self.base.resize(n, None);
            self.preview.resize(n, None);
            self.candidates.resize(n, None);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    sets: Vec<SelectionSet>,
    working: Option<Working>,
}

/// Sort and deduplicate in place.
pub fn normalize(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

/// Combine an existing set with gesture candidates.
pub fn merge_sets(base: &SelectionSet, candidates: &[usize], mode: SelectMode) -> SelectionSet {
    match mode {
        SelectMode::Replace => Some(normalize(candidates.to_vec())),
        SelectMode::Add => match base {
            Some(b) => Some(normalize(b.iter().chain(candidates).copied().collect())),
            None if candidates.is_empty() => None,
            None => Some(normalize(candidates.to_vec())),
        },
        SelectMode::Subtract => base
            .as_ref()
            .map(|b| b.iter().copied().filter(|i| !candidates.contains(i)).collect()),
    }
}

fn any_selected(sets: &[SelectionSet]) -> bool {
    sets.iter().any(|s| s.as_ref().is_some_and(|v| !v.is_empty()))
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_len(&mut self, n: usize) {
        if self.sets.len() < n {
            self.sets.resize(n, None);
        }
    }

    /// Committed set of `trace`.
    pub fn get(&self, trace: usize) -> &SelectionSet {
        static NONE: SelectionSet = None;
        self.sets.get(trace).unwrap_or(&NONE)
    }

    /// Set during a gesture, committed set otherwise.
    pub fn current(&self, trace: usize) -> &SelectionSet {
        match &self.working {
            Some(w) => w.preview.get(trace).unwrap_or_else(|| self.get(trace)),
            None => self.get(trace),
        }
    }

    pub fn is_selected(&self, trace: usize, point: usize) -> bool {
        self.get(trace)
            .as_ref()
            .is_some_and(|s| s.binary_search(&point).is_ok())
    }

    /// At least one trace has a non-empty selection.
    pub fn has_selection(&self) -> bool {
        any_selected(&self.sets)
    }

    pub fn in_progress(&self) -> bool {
        self.working.is_some()
    }

    /// Programmatic write. The set is sorted and deduplicated. During a
    /// gesture it also becomes the trace's snapshot, so the commit merges the
    /// gesture into it instead of overwriting it.
    pub fn set(&mut self, trace: usize, selection: SelectionSet) {
        self.ensure_len(trace + 1);
        let selection = selection.map(normalize);
        if let Some(w) = self.working.as_mut() {
            w.ensure_len(trace + 1);
            w.preview[trace] = match &w.candidates[trace] {
                Some(c) => merge_sets(&selection, c, w.mode),
                None => selection.clone(),
            };
            w.base[trace] = selection.clone();
        }
        self.sets[trace] = selection;
    }

    /// Forget a trace's selection (trace removed or replaced by an
    /// unselectable one).
    pub fn reset(&mut self, trace: usize) {
        if let Some(s) = self.sets.get_mut(trace) {
            *s = None;
        }
        if let Some(w) = self.working.as_mut() {
            if trace < w.base.len() {
                w.base[trace] = None;
                w.preview[trace] = None;
                w.candidates[trace] = None;
            }
        }
    }

    /// Snapshot the committed state for a gesture touching `traces`.
    pub fn begin_selection(&mut self, mode: SelectMode, traces: &[usize]) {
        if let Some(max) = traces.iter().max() {
            self.ensure_len(max + 1);
        }
        self.working = Some(Working {
            mode,
            traces: traces.to_vec(),
            base: self.sets.clone(),
            preview: self.sets.clone(),
            candidates: vec![None; self.sets.len()],
        });
    }

    /// Recompute the working set of `trace` from its snapshot and the
    /// current gesture candidates. Traces outside the gesture are ignored.
    pub fn apply_membership(&mut self, trace: usize, candidates: &[usize]) {
        let Some(w) = self.working.as_mut() else {
            return;
        };
        if !w.traces.contains(&trace) {
            return;
        }
        w.preview[trace] = merge_sets(&w.base[trace], candidates, w.mode);
        w.candidates[trace] = Some(candidates.to_vec());
    }

    pub fn commit(&mut self) -> CommitOutcome {
        let Some(w) = self.working.take() else {
            return CommitOutcome::default();
        };
        let before = any_selected(&self.sets);
        let changed = w.preview != self.sets;
        self.sets = w.preview;
        let after = any_selected(&self.sets);
        debug!(mode = ?w.mode, traces = ?w.traces, changed, "selection committed");
        CommitOutcome {
            changed,
            deselected: before && !after,
        }
    }

    pub fn discard(&mut self) {
        if self.working.take().is_some() {
            debug!("selection discarded");
        }
    }

    /// Reset every trace to "never selected". Returns whether anything was
    /// selected before.
    pub fn clear_all(&mut self) -> bool {
        self.working = None;
        let had = any_selected(&self.sets);
        self.sets.iter_mut().for_each(|s| *s = None);
        had
    }

    /// Opacity of an item under the dimming contract.
    pub fn opacity(&self, trace: usize, point: usize, style: &DimStyle) -> f32 {
        match self.current(trace) {
            Some(s) if s.binary_search(&point).is_err() => style.unselected_opacity,
            _ => style.selected_opacity,
        }
    }
}
