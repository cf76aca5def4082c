// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered row sequence, current row, and flow/ordinal arithmetic.

use alloc::vec::Vec;
use core::num::NonZeroUsize;
use core::ops::Range;

use crate::selection::{SelectMode, Selection};

/// Describes one mutation of the row sequence.
///
/// The layout engine uses [`RowsChange::first_affected_ordinal`] to decide
/// which realized containers must be rebuilt; containers before it are left
/// untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RowsChange {
    /// `count` rows were inserted starting at row index `at`.
    Inserted {
        /// Row index of the first inserted row.
        at: usize,
        /// Number of rows inserted.
        count: usize,
    },
    /// `count` rows were removed starting at row index `at`.
    Removed {
        /// Row index of the first removed row.
        at: usize,
        /// Number of rows removed.
        count: usize,
    },
    /// The row at `at` changed identity without a position change.
    Reloaded {
        /// Row index of the reloaded row.
        at: usize,
    },
}

impl RowsChange {
    /// Row index of the first row affected by this change.
    #[must_use]
    pub const fn first_affected_row(&self) -> usize {
        match self {
            Self::Inserted { at, .. } | Self::Removed { at, .. } | Self::Reloaded { at } => *at,
        }
    }

    /// Ordinal of the first container affected by this change.
    ///
    /// Containers with a lower ordinal hold only rows before the change and
    /// need neither rebuild nor refresh of their structure.
    #[must_use]
    pub const fn first_affected_ordinal(&self, flow_count: usize) -> usize {
        self.first_affected_row() / flow_count
    }

    /// Returns `true` if this change only swaps a row's identity in place.
    #[must_use]
    pub const fn is_reload(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

/// Source of truth for the ordered row sequence of one grid.
///
/// Owns the host rows, the current-row pointer, the [`Selection`], and the
/// flow count, and maps row indices onto container ordinals. Every mutation
/// returns a [`RowsChange`] for the layout engine to consume.
#[derive(Clone, Debug)]
pub struct RowManager<R> {
    rows: Vec<R>,
    current: Option<usize>,
    selection: Selection,
    flow_count: NonZeroUsize,
}

impl<R> RowManager<R> {
    /// Creates an empty manager with the given flow count (rows per block).
    #[must_use]
    pub fn new(flow_count: NonZeroUsize) -> Self {
        Self {
            rows: Vec::new(),
            current: None,
            selection: Selection::new(),
            flow_count,
        }
    }

    /// Creates a manager over an existing row sequence.
    #[must_use]
    pub fn with_rows(rows: Vec<R>, flow_count: NonZeroUsize) -> Self {
        Self {
            rows,
            current: None,
            selection: Selection::new(),
            flow_count,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    /// Returns the row at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.rows.get_mut(index)
    }

    /// The whole row sequence in order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// The whole row sequence mutably, for in-place value edits.
    ///
    /// Edits through this do not change row identity or count, so no
    /// [`RowsChange`] is produced; callers refresh affected elements
    /// themselves.
    pub fn rows_mut(&mut self) -> &mut [R] {
        &mut self.rows
    }

    /// Rows per block.
    #[must_use]
    pub const fn flow_count(&self) -> usize {
        self.flow_count.get()
    }

    /// Ordinal of the container holding row `index`.
    #[must_use]
    pub const fn ordinal_of_row(&self, index: usize) -> usize {
        index / self.flow_count.get()
    }

    /// Number of containers along the main axis. Zero for an empty sequence.
    #[must_use]
    pub const fn container_count(&self) -> usize {
        self.rows.len().div_ceil(self.flow_count.get())
    }

    /// Row indices held by the container at `ordinal`, clamped to the
    /// sequence length (the final block may be partial).
    #[must_use]
    pub fn rows_in_container(&self, ordinal: usize) -> Range<usize> {
        let flow = self.flow_count.get();
        let start = (ordinal * flow).min(self.rows.len());
        let end = (start + flow).min(self.rows.len());
        start..end
    }

    /// The current row index, if any.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Moves the current-row pointer.
    pub fn set_current(&mut self, index: Option<usize>) {
        debug_assert!(
            index.is_none_or(|i| i < self.rows.len()),
            "current row out of bounds"
        );
        self.current = index;
    }

    /// The selection set.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selects row `index` with the given mode and makes it current.
    ///
    /// The previous current row is the anchor for [`SelectMode::Extended`].
    pub fn select(&mut self, index: usize, mode: SelectMode) {
        debug_assert!(index < self.rows.len(), "selected row out of bounds");
        let previous = self.current;
        self.selection.select(index, mode, previous);
        self.current = Some(index);
    }

    /// Appends a row at the end of the sequence.
    pub fn push(&mut self, row: R) -> RowsChange {
        let at = self.rows.len();
        self.rows.push(row);
        RowsChange::Inserted { at, count: 1 }
    }

    /// Inserts a row at `at`, shifting later rows, selection, and the
    /// current-row pointer.
    pub fn insert(&mut self, at: usize, row: R) -> RowsChange {
        self.rows.insert(at, row);
        self.selection.shift_inserted(at, 1);
        if let Some(current) = self.current.as_mut()
            && *current >= at
        {
            *current += 1;
        }
        RowsChange::Inserted { at, count: 1 }
    }

    /// Removes the row at `at`, shifting later rows, selection, and the
    /// current-row pointer. A removed current row leaves the pointer on the
    /// row now occupying `at` (or the new last row).
    pub fn remove(&mut self, at: usize) -> (R, RowsChange) {
        let row = self.rows.remove(at);
        self.selection.shift_removed(at, 1);
        self.current = match self.current {
            Some(current) if current > at => Some(current - 1),
            Some(current) if current == at => {
                if self.rows.is_empty() {
                    None
                } else {
                    Some(at.min(self.rows.len() - 1))
                }
            }
            other => other,
        };
        (row, RowsChange::Removed { at, count: 1 })
    }

    /// Swaps the identity of the row at `at` without a position change.
    ///
    /// This is the reload path: after an edit commit produces a new presenter
    /// instance for the same logical row, the container holding it swaps the
    /// bound target without rebuilding sibling elements.
    pub fn replace(&mut self, at: usize, row: R) -> (R, RowsChange) {
        let old = core::mem::replace(&mut self.rows[at], row);
        (old, RowsChange::Reloaded { at })
    }
}
