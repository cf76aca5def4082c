// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection state over row indices.

use hashbrown::HashSet;

/// How a select operation combines with the existing selection.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SelectMode {
    /// Replace the selection with the one row.
    Single,
    /// Toggle the row's membership, keeping the rest of the selection.
    Multiple,
    /// Select the contiguous range from the previous current row to this row.
    Extended,
}

/// The set of selected row indices plus the range anchor.
///
/// Indices track the row sequence: [`Selection::shift_inserted`] and
/// [`Selection::shift_removed`] keep the set consistent across mutations so a
/// selected row stays selected while rows move around it.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    selected: HashSet<usize>,
    anchor: Option<usize>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns `true` if the row at `index` is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Iterates the selected indices in unspecified order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Clears the selection and the anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Applies a select operation.
    ///
    /// `previous_current` is the current row before the operation; `Extended`
    /// selects the contiguous range from it (or from the last anchor) to
    /// `index`.
    pub fn select(&mut self, index: usize, mode: SelectMode, previous_current: Option<usize>) {
        match mode {
            SelectMode::Single => {
                self.selected.clear();
                self.selected.insert(index);
                self.anchor = Some(index);
            }
            SelectMode::Multiple => {
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
                self.anchor = Some(index);
            }
            SelectMode::Extended => {
                let anchor = previous_current.or(self.anchor).unwrap_or(index);
                self.selected.clear();
                let (lo, hi) = if anchor <= index {
                    (anchor, index)
                } else {
                    (index, anchor)
                };
                for i in lo..=hi {
                    self.selected.insert(i);
                }
                self.anchor = Some(anchor);
            }
        }
    }

    /// Shifts selected indices up to account for `count` rows inserted at `at`.
    pub fn shift_inserted(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let shifted: HashSet<usize> = self
            .selected
            .iter()
            .map(|&i| if i >= at { i + count } else { i })
            .collect();
        self.selected = shifted;
        if let Some(anchor) = self.anchor.as_mut()
            && *anchor >= at
        {
            *anchor += count;
        }
    }

    /// Shifts selected indices down for `count` rows removed at `at`,
    /// evicting indices inside the removed range.
    pub fn shift_removed(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let end = at + count;
        let shifted: HashSet<usize> = self
            .selected
            .iter()
            .filter(|&&i| i < at || i >= end)
            .map(|&i| if i >= end { i - count } else { i })
            .collect();
        self.selected = shifted;
        self.anchor = match self.anchor {
            Some(anchor) if anchor >= end => Some(anchor - count),
            Some(anchor) if anchor >= at => None,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectMode, Selection};

    #[test]
    fn single_replaces_the_selection() {
        let mut selection = Selection::new();
        selection.select(2, SelectMode::Single, None);
        selection.select(5, SelectMode::Single, Some(2));
        assert!(selection.contains(5));
        assert!(!selection.contains(2));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn multiple_toggles_membership() {
        let mut selection = Selection::new();
        selection.select(1, SelectMode::Multiple, None);
        selection.select(3, SelectMode::Multiple, Some(1));
        assert_eq!(selection.len(), 2);
        selection.select(1, SelectMode::Multiple, Some(3));
        assert!(!selection.contains(1));
        assert!(selection.contains(3));
    }

    #[test]
    fn extended_selects_the_range_from_the_previous_current_row() {
        let mut selection = Selection::new();
        selection.select(2, SelectMode::Single, None);
        selection.select(5, SelectMode::Extended, Some(2));
        assert_eq!(selection.len(), 4);
        for i in 2..=5 {
            assert!(selection.contains(i), "row {i} should be selected");
        }

        // Extending again from the same anchor replaces the range.
        selection.select(0, SelectMode::Extended, Some(5));
        assert!(selection.contains(0));
        assert!(selection.contains(5));
        assert_eq!(selection.len(), 6);
    }

    #[test]
    fn shifts_track_row_mutations() {
        let mut selection = Selection::new();
        selection.select(1, SelectMode::Multiple, None);
        selection.select(4, SelectMode::Multiple, Some(1));

        selection.shift_inserted(2, 2);
        assert!(selection.contains(1));
        assert!(selection.contains(6));

        selection.shift_removed(0, 2);
        assert!(!selection.contains(1));
        assert!(selection.contains(4));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn removal_evicts_selected_rows_in_range() {
        let mut selection = Selection::new();
        selection.select(3, SelectMode::Single, None);
        selection.shift_removed(2, 3);
        assert!(selection.is_empty());
    }
}
