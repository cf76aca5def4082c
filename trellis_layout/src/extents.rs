// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-container main-axis extents with a lazily-maintained prefix-sum cache.

use alloc::vec::Vec;

/// Main-axis extents of every container, realized or not.
///
/// Realized containers report measured extents; unrealized ones carry an
/// estimate until they are first measured. Prefix sums are maintained lazily
/// from the lowest dirty ordinal, so scattered updates stay cheap, and
/// [`ContainerExtents::ordinal_at_offset`] resolves scroll offsets with a
/// binary search over the cached starts.
#[derive(Clone, Debug)]
pub(crate) struct ContainerExtents {
    extents: Vec<f64>,
    prefix_starts: Vec<f64>,
    dirty_from: Option<usize>,
    estimate: f64,
}

impl ContainerExtents {
    pub(crate) fn new(estimate: f64) -> Self {
        Self {
            extents: Vec::new(),
            prefix_starts: Vec::new(),
            dirty_from: Some(0),
            estimate: estimate.max(0.0),
        }
    }

    /// Ensures storage for `len` containers; new ones receive the estimate.
    pub(crate) fn set_len(&mut self, len: usize) {
        let old = self.extents.len();
        self.extents.resize(len, self.estimate);
        if self.prefix_starts.len() < len {
            self.prefix_starts.resize(len, 0.0);
        }
        if len != old {
            let from = old.min(len);
            self.dirty_from = Some(self.dirty_from.unwrap_or(from).min(from));
        }
    }

    /// Resets every extent back to the estimate.
    pub(crate) fn reset(&mut self) {
        for extent in &mut self.extents {
            *extent = self.estimate;
        }
        self.dirty_from = Some(0);
    }

    /// Records the measured extent of one container.
    pub(crate) fn set_extent(&mut self, ordinal: usize, extent: f64) {
        if ordinal >= self.extents.len() {
            self.set_len(ordinal + 1);
        }
        debug_assert!(
            extent.is_finite(),
            "container extents must be finite; got {extent:?}"
        );
        let extent = if extent.is_sign_negative() { 0.0 } else { extent };
        if self.extents[ordinal] != extent {
            self.extents[ordinal] = extent;
            self.dirty_from = Some(self.dirty_from.unwrap_or(ordinal).min(ordinal));
        }
    }

    fn ensure_prefix_through(&mut self, through: usize) {
        let len = self.extents.len();
        if len == 0 || through >= len {
            return;
        }
        let dirty_from = match self.dirty_from {
            Some(d) if d <= through => d,
            _ => return,
        };
        let mut pos = if dirty_from == 0 {
            0.0
        } else {
            self.prefix_starts[dirty_from - 1] + self.extents[dirty_from - 1]
        };
        for i in dirty_from..len {
            self.prefix_starts[i] = pos;
            pos += self.extents[i];
        }
        self.dirty_from = None;
    }

    /// Offset of the start of container `ordinal` from the start of the strip.
    pub(crate) fn offset_of(&mut self, ordinal: usize) -> f64 {
        if ordinal == 0 || self.extents.is_empty() {
            return 0.0;
        }
        let i = ordinal.min(self.extents.len() - 1);
        self.ensure_prefix_through(i);
        if ordinal >= self.extents.len() {
            self.prefix_starts[i] + self.extents[i]
        } else {
            self.prefix_starts[i]
        }
    }

    pub(crate) fn extent_of(&self, ordinal: usize) -> f64 {
        self.extents.get(ordinal).copied().unwrap_or(0.0)
    }

    /// Total extent of all containers.
    pub(crate) fn total(&mut self) -> f64 {
        let len = self.extents.len();
        if len == 0 {
            return 0.0;
        }
        self.ensure_prefix_through(len - 1);
        self.prefix_starts[len - 1] + self.extents[len - 1]
    }

    /// First ordinal whose start is at or before `offset`.
    pub(crate) fn ordinal_at_offset(&mut self, offset: f64) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.ensure_prefix_through(len - 1);
        let target = offset.max(0.0);
        match self.prefix_starts[..len].binary_search_by(|pos| {
            pos.partial_cmp(&target)
                .unwrap_or(core::cmp::Ordering::Equal)
        }) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}
