use std::collections::BTreeSet;

use super::model::{CurveSet, LabelSet};
use super::ordering::{display_labels, order_keys};
use crate::error::SelectError;

// ---------------------------------------------------------------------------
// SelectionResult – kept / removed partition
// ---------------------------------------------------------------------------

/// Partition of the full key set after the user confirms a selection.
/// Both lists follow display order and never share a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub kept: Vec<String>,
    pub removed: Vec<String>,
}

/// Split `keys` into those at `selected` indices and the rest.
/// Indices past the end of `keys` are ignored.
pub fn reconcile(keys: &[String], selected: &BTreeSet<usize>) -> SelectionResult {
    let (kept, removed): (Vec<_>, Vec<_>) = keys
        .iter()
        .enumerate()
        .partition(|(i, _)| selected.contains(i));

    SelectionResult {
        kept: kept.into_iter().map(|(_, k)| k.clone()).collect(),
        removed: removed.into_iter().map(|(_, k)| k.clone()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Selection – what the list widget currently marks as "keep"
// ---------------------------------------------------------------------------

/// Ordered keys, their display strings, and the indices currently selected.
#[derive(Debug, Clone)]
pub struct Selection {
    keys: Vec<String>,
    labels: Vec<String>,
    selected: BTreeSet<usize>,
}

impl Selection {
    /// Order the keys of `curves` and build the initial selection.
    ///
    /// Without a preselection every key starts selected. With one, only keys
    /// that appear in it (compared as strings) start selected.
    pub fn new<S: ToString>(
        curves: &CurveSet,
        labels: Option<&LabelSet>,
        preselect: Option<&[S]>,
    ) -> Result<Self, SelectError> {
        let keys = order_keys(curves);
        let labels = display_labels(&keys, labels)?;

        let selected = match preselect {
            None => (0..keys.len()).collect(),
            Some(items) => {
                let wanted: BTreeSet<String> = items.iter().map(|s| s.to_string()).collect();
                keys.iter()
                    .enumerate()
                    .filter(|(_, k)| wanted.contains(*k))
                    .map(|(i, _)| i)
                    .collect()
            }
        };

        Ok(Selection {
            keys,
            labels,
            selected,
        })
    }

    /// Keys in display order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Display strings, parallel to [`Self::keys`].
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected keys in display order.
    pub fn selected_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.selected.iter().map(|&i| self.keys[i].as_str())
    }

    /// Plain click: this entry becomes the only selected one.
    pub fn select_only(&mut self, index: usize) {
        self.selected.clear();
        if index < self.keys.len() {
            self.selected.insert(index);
        }
    }

    /// Ctrl-click: flip one entry.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.keys.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Shift-click: select the inclusive range between `anchor` and `index`,
    /// dropping everything else.
    pub fn select_range(&mut self, anchor: usize, index: usize) {
        let last = match self.keys.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        };
        let (lo, hi) = (anchor.min(index), anchor.max(index).min(last));
        self.selected = (lo..=hi).collect();
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.keys.len()).collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Kept/removed partition of the current selection.
    pub fn result(&self) -> SelectionResult {
        reconcile(&self.keys, &self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Curve;

    fn curve_set(keys: &[&str]) -> CurveSet {
        keys.iter()
            .map(|k| (k.to_string(), Curve::from_points(&[[1e-6, 1.0], [1e-3, 0.0]])))
            .collect()
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partition_is_disjoint_and_complete_for_every_subset() {
        let all = keys(&["#1:", "#2:", "#3:", "#4:"]);
        for mask in 0u32..(1 << all.len()) {
            let selected: BTreeSet<usize> =
                (0..all.len()).filter(|i| mask & (1 << i) != 0).collect();
            let res = reconcile(&all, &selected);

            let kept: BTreeSet<&String> = res.kept.iter().collect();
            let removed: BTreeSet<&String> = res.removed.iter().collect();
            assert!(kept.is_disjoint(&removed), "mask {mask:#b}");

            let mut union: Vec<String> = res.kept.iter().chain(&res.removed).cloned().collect();
            union.sort();
            assert_eq!(union, all, "mask {mask:#b}");
        }
    }

    #[test]
    fn reconcile_keeps_display_order() {
        let all = keys(&["#1:", "#2:", "#3:", "#10:"]);
        let res = reconcile(&all, &[3, 0].into());
        assert_eq!(res.kept, keys(&["#1:", "#10:"]));
        assert_eq!(res.removed, keys(&["#2:", "#3:"]));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let all = keys(&["#1:", "#2:"]);
        let res = reconcile(&all, &[1, 7].into());
        assert_eq!(res.kept, keys(&["#2:"]));
        assert_eq!(res.removed, keys(&["#1:"]));
    }

    #[test]
    fn everything_selected_by_default() {
        let sel = Selection::new::<&str>(&curve_set(&["#2:", "#1:", "#10:"]), None, None).unwrap();
        assert_eq!(sel.keys(), keys(&["#1:", "#2:", "#10:"]));
        assert_eq!(sel.labels(), sel.keys());
        let res = sel.result();
        assert_eq!(res.kept, keys(&["#1:", "#2:", "#10:"]));
        assert!(res.removed.is_empty());
    }

    #[test]
    fn preselection_narrows_initial_selection() {
        let sel = Selection::new(
            &curve_set(&["#1:", "#2:", "#3:"]),
            None,
            Some(&["#2:", "#3:"][..]),
        )
        .unwrap();
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["#2:", "#3:"]);

        let res = sel.result();
        assert_eq!(res.kept, keys(&["#2:", "#3:"]));
        assert_eq!(res.removed, keys(&["#1:"]));
    }

    #[test]
    fn preselection_items_are_compared_as_strings() {
        let sel = Selection::new(&curve_set(&["1", "2", "3"]), None, Some(&[3, 42][..])).unwrap();
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["3"]);
    }

    #[test]
    fn missing_label_fails_construction() {
        let labels: LabelSet = [("#1:".to_string(), "A".to_string())].into();
        let err = Selection::new::<&str>(&curve_set(&["#1:", "#2:"]), Some(&labels), None)
            .unwrap_err();
        assert_eq!(err, SelectError::MissingLabel { key: "#2:".into() });
    }

    #[test]
    fn empty_curve_set_is_valid() {
        let sel = Selection::new::<&str>(&CurveSet::new(), None, None).unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.result(), SelectionResult::default());
    }

    #[test]
    fn click_ctrl_click_and_shift_click() {
        let mut sel =
            Selection::new::<&str>(&curve_set(&["#1:", "#2:", "#3:", "#4:"]), None, None).unwrap();

        sel.select_only(1);
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["#2:"]);

        sel.toggle(3);
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["#2:", "#4:"]);
        sel.toggle(1);
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["#4:"]);

        sel.select_range(3, 1);
        assert_eq!(sel.selected_keys().collect::<Vec<_>>(), vec!["#2:", "#3:", "#4:"]);

        sel.select_none();
        assert_eq!(sel.selected_count(), 0);
        sel.select_all();
        assert_eq!(sel.selected_count(), 4);
    }
}
