// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry vocabulary shared by the template and the layout engine.

use core::ops::Range;

/// A coordinate into the track grid: column-track index, row-track index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GridPoint {
    /// Column-track index.
    pub x: usize,
    /// Row-track index.
    pub y: usize,
}

impl GridPoint {
    /// Creates a new grid point.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// The rectangular cell range a binding occupies: an origin plus extents.
///
/// Spans are at least one track on each axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GridSpan {
    /// Top-left anchor of the span.
    pub origin: GridPoint,
    /// Number of column tracks covered (>= 1).
    pub column_span: usize,
    /// Number of row tracks covered (>= 1).
    pub row_span: usize,
}

impl GridSpan {
    /// Creates a span covering `column_span` x `row_span` tracks from `origin`.
    ///
    /// Zero extents are clamped to one track.
    #[must_use]
    pub const fn new(origin: GridPoint, column_span: usize, row_span: usize) -> Self {
        Self {
            origin,
            column_span: if column_span == 0 { 1 } else { column_span },
            row_span: if row_span == 0 { 1 } else { row_span },
        }
    }

    /// Creates a single-cell span.
    #[must_use]
    pub const fn cell(origin: GridPoint) -> Self {
        Self::new(origin, 1, 1)
    }

    /// Column-track indices covered by this span, as a half-open range.
    #[must_use]
    pub const fn x_range(&self) -> Range<usize> {
        self.origin.x..self.origin.x + self.column_span
    }

    /// Row-track indices covered by this span, as a half-open range.
    #[must_use]
    pub const fn y_range(&self) -> Range<usize> {
        self.origin.y..self.origin.y + self.row_span
    }

    /// Returns `true` if the span fits within a grid of the given track counts.
    #[must_use]
    pub const fn fits(&self, columns: usize, rows: usize) -> bool {
        self.x_range().end <= columns && self.y_range().end <= rows
    }
}

/// Four-sided inset describing how much of an element's bounding rectangle is
/// hidden behind a frozen pane or viewport edge.
///
/// Each side is non-negative; [`f64::INFINITY`] on a side means the element is
/// entirely behind that side's pane and should not be rendered. An element
/// fully inside a frozen pane, or fully inside the unclipped viewport, has the
/// zero clip [`Clip::NONE`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Clip {
    /// Inset hidden on the left edge.
    pub left: f64,
    /// Inset hidden on the top edge.
    pub top: f64,
    /// Inset hidden on the right edge.
    pub right: f64,
    /// Inset hidden on the bottom edge.
    pub bottom: f64,
}

impl Clip {
    /// The zero clip: the element is fully visible.
    pub const NONE: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Creates a clip from explicit insets.
    ///
    /// Finite negative insets are clamped to zero.
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.max(0.0),
            top: top.max(0.0),
            right: right.max(0.0),
            bottom: bottom.max(0.0),
        }
    }

    /// Returns `true` if no side is clipped at all.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if the element is entirely hidden on some side.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.left.is_infinite()
            || self.top.is_infinite()
            || self.right.is_infinite()
            || self.bottom.is_infinite()
    }
}

impl Default for Clip {
    fn default() -> Self {
        Self::NONE
    }
}

/// Opaque styling handle for a grid line.
///
/// Layout only computes line geometry; hosts map a `PenId` to whatever pen or
/// stroke object their renderer uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PenId(pub u32);
