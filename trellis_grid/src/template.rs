// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immutable grid template and its batching builder.

use alloc::vec::Vec;
use core::num::NonZeroUsize;
use core::ops::Range;

use crate::error::{Axis, TemplateError};
use crate::geometry::{GridPoint, GridSpan, PenId};
use crate::track::{TrackList, TrackSizing};

/// Which axis containers flow along: the scrolling "main" axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Orientation {
    /// Containers stack top to bottom; the row-track axis scrolls.
    Vertical,
    /// Containers stack left to right; the column-track axis scrolls.
    Horizontal,
}

/// Placement of a block binding relative to the row flow within a block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockSplit {
    /// Before the row flow.
    Head,
    /// After the row flow.
    Tail,
}

/// Identifies one declared binding slot of a template.
///
/// Slots index into the template's binding collections in declaration order
/// and key all per-element geometry queries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Slot {
    /// The i-th scalar binding: exists once regardless of row count.
    Scalar(usize),
    /// The i-th row binding: repeats once per row.
    Row(usize),
    /// The i-th head block binding: once per block, before the row flow.
    BlockHead(usize),
    /// The i-th tail block binding: once per block, after the row flow.
    BlockTail(usize),
}

/// A declared binding placeholder: the cell range it occupies.
///
/// Binding execution (creating and refreshing actual elements) is external;
/// the template only records where each element goes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BindingDef {
    /// The cell range the binding's element occupies.
    pub span: GridSpan,
}

/// Direction a grid line runs in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineAxis {
    /// The line runs left to right, along column tracks.
    Horizontal,
    /// The line runs top to bottom, along row tracks.
    Vertical,
}

/// Which edge of the anchor track the line sits on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LinePlacement {
    /// The leading (top/left) edge of the anchor track.
    Head,
    /// The trailing (bottom/right) edge of the anchor track.
    Tail,
}

/// A declared decorative grid line.
///
/// A horizontal line sits on an edge of row track `anchor.y` and runs across
/// `run` column tracks starting at `anchor.x`; a vertical line is the mirror
/// image. Lines anchored inside frozen regions do not scroll.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLineDef {
    /// Direction the line runs in.
    pub axis: LineAxis,
    /// Anchor cell; see the type-level docs for how each axis reads it.
    pub anchor: GridPoint,
    /// Run length in tracks along `axis` (>= 1).
    pub run: usize,
    /// Edge of the anchor track the line sits on.
    pub placement: LinePlacement,
    /// Opaque styling handle carried through to the emitted figure.
    pub pen: PenId,
}

/// The immutable screen definition the layout engine consumes.
///
/// Built once per screen composition through [`GridTemplate::builder`]; all
/// structural validation happens in [`TemplateBuilder::build`] and the result
/// never changes during active layout.
#[derive(Clone, Debug)]
pub struct GridTemplate {
    orientation: Orientation,
    flow_count: NonZeroUsize,
    column_sizings: Vec<TrackSizing>,
    row_sizings: Vec<TrackSizing>,
    frozen_left: usize,
    frozen_right: usize,
    frozen_top: usize,
    frozen_bottom: usize,
    stretch_column: Option<usize>,
    stretch_row: Option<usize>,
    scalar_bindings: Vec<BindingDef>,
    row_bindings: Vec<BindingDef>,
    block_head_bindings: Vec<BindingDef>,
    block_tail_bindings: Vec<BindingDef>,
    grid_lines: Vec<GridLineDef>,
    /// Column-track range covered by row bindings.
    row_x: Range<usize>,
    /// Row-track range covered by row bindings.
    row_y: Range<usize>,
}

impl GridTemplate {
    /// Starts a new template definition.
    #[must_use]
    pub fn builder(orientation: Orientation) -> TemplateBuilder {
        TemplateBuilder::new(orientation)
    }

    /// The scrolling main axis.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Rows per block. One means plain row containers.
    #[must_use]
    pub const fn flow_count(&self) -> usize {
        self.flow_count.get()
    }

    /// Number of declared column tracks.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_sizings.len()
    }

    /// Number of declared row tracks.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_sizings.len()
    }

    /// The declared scalar bindings, in declaration order.
    #[must_use]
    pub fn scalar_bindings(&self) -> &[BindingDef] {
        &self.scalar_bindings
    }

    /// The declared row bindings, in declaration order.
    #[must_use]
    pub fn row_bindings(&self) -> &[BindingDef] {
        &self.row_bindings
    }

    /// Number of row bindings; every realized row owns exactly this many elements.
    #[must_use]
    pub fn row_binding_count(&self) -> usize {
        self.row_bindings.len()
    }

    /// Block bindings placed before the row flow, in declaration order.
    #[must_use]
    pub fn block_head_bindings(&self) -> &[BindingDef] {
        &self.block_head_bindings
    }

    /// Block bindings placed after the row flow, in declaration order.
    #[must_use]
    pub fn block_tail_bindings(&self) -> &[BindingDef] {
        &self.block_tail_bindings
    }

    /// The declared grid lines.
    #[must_use]
    pub fn grid_lines(&self) -> &[GridLineDef] {
        &self.grid_lines
    }

    /// Looks up a binding definition by slot.
    #[must_use]
    pub fn binding(&self, slot: Slot) -> Option<&BindingDef> {
        match slot {
            Slot::Scalar(i) => self.scalar_bindings.get(i),
            Slot::Row(i) => self.row_bindings.get(i),
            Slot::BlockHead(i) => self.block_head_bindings.get(i),
            Slot::BlockTail(i) => self.block_tail_bindings.get(i),
        }
    }

    /// Column-track range covered by the repeating row region.
    #[must_use]
    pub fn row_x_range(&self) -> Range<usize> {
        self.row_x.clone()
    }

    /// Row-track range covered by the repeating row region.
    #[must_use]
    pub fn row_y_range(&self) -> Range<usize> {
        self.row_y.clone()
    }

    /// Builds the runtime track list for the column axis.
    #[must_use]
    pub fn column_track_list(&self) -> TrackList {
        TrackList::new(
            self.column_sizings.iter().copied(),
            self.frozen_left,
            self.frozen_right,
            self.stretch_column,
        )
    }

    /// Builds the runtime track list for the row axis.
    #[must_use]
    pub fn row_track_list(&self) -> TrackList {
        TrackList::new(
            self.row_sizings.iter().copied(),
            self.frozen_top,
            self.frozen_bottom,
            self.stretch_row,
        )
    }

    /// Main-axis track range of a span: the axis containers flow along.
    #[must_use]
    pub fn main_range(&self, span: GridSpan) -> Range<usize> {
        match self.orientation {
            Orientation::Vertical => span.y_range(),
            Orientation::Horizontal => span.x_range(),
        }
    }

    /// Cross-axis track range of a span.
    #[must_use]
    pub fn cross_range(&self, span: GridSpan) -> Range<usize> {
        match self.orientation {
            Orientation::Vertical => span.x_range(),
            Orientation::Horizontal => span.y_range(),
        }
    }

    /// Main-axis track range of the row region.
    #[must_use]
    pub fn row_main_range(&self) -> Range<usize> {
        match self.orientation {
            Orientation::Vertical => self.row_y.clone(),
            Orientation::Horizontal => self.row_x.clone(),
        }
    }

    /// Cross-axis track range of the row region. With a flow count above one
    /// this range repeats once per flow slot along the cross axis.
    #[must_use]
    pub fn row_cross_range(&self) -> Range<usize> {
        match self.orientation {
            Orientation::Vertical => self.row_x.clone(),
            Orientation::Horizontal => self.row_y.clone(),
        }
    }
}

/// Batches a whole template definition for one validation pass.
///
/// This is the `BeginSetup`/`EndSetup` sequencing of the origin design: all
/// mutations happen on the builder, [`TemplateBuilder::build`] validates the
/// definition as a whole, and the resulting [`GridTemplate`] is immutable.
#[derive(Debug)]
pub struct TemplateBuilder {
    orientation: Orientation,
    flow_count: NonZeroUsize,
    column_sizings: Vec<TrackSizing>,
    row_sizings: Vec<TrackSizing>,
    frozen_left: usize,
    frozen_right: usize,
    frozen_top: usize,
    frozen_bottom: usize,
    stretch_columns: Vec<usize>,
    stretch_rows: Vec<usize>,
    scalar_bindings: Vec<BindingDef>,
    row_bindings: Vec<BindingDef>,
    block_bindings: Vec<(BlockSplit, BindingDef)>,
    grid_lines: Vec<GridLineDef>,
}

impl TemplateBuilder {
    fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            flow_count: NonZeroUsize::MIN,
            column_sizings: Vec::new(),
            row_sizings: Vec::new(),
            frozen_left: 0,
            frozen_right: 0,
            frozen_top: 0,
            frozen_bottom: 0,
            stretch_columns: Vec::new(),
            stretch_rows: Vec::new(),
            scalar_bindings: Vec::new(),
            row_bindings: Vec::new(),
            block_bindings: Vec::new(),
            grid_lines: Vec::new(),
        }
    }

    /// Declares the column tracks.
    #[must_use]
    pub fn columns(mut self, sizings: impl IntoIterator<Item = TrackSizing>) -> Self {
        self.column_sizings = sizings.into_iter().collect();
        self
    }

    /// Declares the row tracks.
    #[must_use]
    pub fn rows(mut self, sizings: impl IntoIterator<Item = TrackSizing>) -> Self {
        self.row_sizings = sizings.into_iter().collect();
        self
    }

    /// Sets the number of rows per block.
    #[must_use]
    pub const fn flow_count(mut self, count: NonZeroUsize) -> Self {
        self.flow_count = count;
        self
    }

    /// Freezes the first `count` column tracks on the left edge.
    #[must_use]
    pub const fn frozen_left(mut self, count: usize) -> Self {
        self.frozen_left = count;
        self
    }

    /// Freezes the last `count` column tracks on the right edge.
    #[must_use]
    pub const fn frozen_right(mut self, count: usize) -> Self {
        self.frozen_right = count;
        self
    }

    /// Freezes the first `count` row tracks on the top edge.
    #[must_use]
    pub const fn frozen_top(mut self, count: usize) -> Self {
        self.frozen_top = count;
        self
    }

    /// Freezes the last `count` row tracks on the bottom edge.
    #[must_use]
    pub const fn frozen_bottom(mut self, count: usize) -> Self {
        self.frozen_bottom = count;
        self
    }

    /// Designates the column track that absorbs leftover viewport width.
    #[must_use]
    pub fn stretch_column(mut self, index: usize) -> Self {
        self.stretch_columns.push(index);
        self
    }

    /// Designates the row track that absorbs leftover viewport height.
    #[must_use]
    pub fn stretch_row(mut self, index: usize) -> Self {
        self.stretch_rows.push(index);
        self
    }

    /// Declares a scalar binding: one element regardless of row count.
    #[must_use]
    pub fn scalar_binding(mut self, span: GridSpan) -> Self {
        self.scalar_bindings.push(BindingDef { span });
        self
    }

    /// Declares a row binding: one element per realized row.
    #[must_use]
    pub fn row_binding(mut self, span: GridSpan) -> Self {
        self.row_bindings.push(BindingDef { span });
        self
    }

    /// Declares a block binding on the given side of the row flow.
    #[must_use]
    pub fn block_binding(mut self, split: BlockSplit, span: GridSpan) -> Self {
        self.block_bindings.push((split, BindingDef { span }));
        self
    }

    /// Declares a decorative grid line.
    #[must_use]
    pub fn grid_line(
        mut self,
        axis: LineAxis,
        anchor: GridPoint,
        run: usize,
        placement: LinePlacement,
        pen: PenId,
    ) -> Self {
        self.grid_lines.push(GridLineDef {
            axis,
            anchor,
            run: run.max(1),
            placement,
            pen,
        });
        self
    }

    /// Validates the batched definition and produces the immutable template.
    pub fn build(self) -> Result<GridTemplate, TemplateError> {
        let columns = self.column_sizings.len();
        let rows = self.row_sizings.len();

        if self.frozen_left + self.frozen_right > columns {
            return Err(TemplateError::FrozenOutOfBounds { axis: Axis::Column });
        }
        if self.frozen_top + self.frozen_bottom > rows {
            return Err(TemplateError::FrozenOutOfBounds { axis: Axis::Row });
        }

        let stretch_column = Self::single_stretch(&self.stretch_columns, columns, Axis::Column)?;
        let stretch_row = Self::single_stretch(&self.stretch_rows, rows, Axis::Row)?;

        if self.row_bindings.is_empty() {
            return Err(TemplateError::NoRowBindings);
        }
        for (i, def) in self.row_bindings.iter().enumerate() {
            if !def.span.fits(columns, rows) {
                return Err(TemplateError::SpanOutOfBounds { slot: Slot::Row(i) });
            }
        }

        // The row region is the union of the row binding spans.
        let row_x = Self::span_union(self.row_bindings.iter().map(|d| d.span.x_range()));
        let row_y = Self::span_union(self.row_bindings.iter().map(|d| d.span.y_range()));

        let (row_main, main_head, main_tail, main_len) = match self.orientation {
            Orientation::Vertical => (row_y.clone(), self.frozen_top, self.frozen_bottom, rows),
            Orientation::Horizontal => {
                (row_x.clone(), self.frozen_left, self.frozen_right, columns)
            }
        };
        if row_main.start < main_head || row_main.end > main_len - main_tail {
            return Err(TemplateError::RowRegionInFrozen);
        }

        for (i, def) in self.scalar_bindings.iter().enumerate() {
            if !def.span.fits(columns, rows) {
                return Err(TemplateError::SpanOutOfBounds {
                    slot: Slot::Scalar(i),
                });
            }
            let main = match self.orientation {
                Orientation::Vertical => def.span.y_range(),
                Orientation::Horizontal => def.span.x_range(),
            };
            if main.start < row_main.end && main.end > row_main.start {
                return Err(TemplateError::ScalarInRowRegion { index: i });
            }
        }

        let row_cross = match self.orientation {
            Orientation::Vertical => row_x.clone(),
            Orientation::Horizontal => row_y.clone(),
        };
        let mut block_head_bindings = Vec::new();
        let mut block_tail_bindings = Vec::new();
        for (i, (split, def)) in self.block_bindings.iter().enumerate() {
            if !def.span.fits(columns, rows) {
                let slot = match split {
                    BlockSplit::Head => Slot::BlockHead(block_head_bindings.len()),
                    BlockSplit::Tail => Slot::BlockTail(block_tail_bindings.len()),
                };
                return Err(TemplateError::SpanOutOfBounds { slot });
            }
            let cross = match self.orientation {
                Orientation::Vertical => def.span.x_range(),
                Orientation::Horizontal => def.span.y_range(),
            };
            match split {
                BlockSplit::Head => {
                    if cross.end > row_cross.start {
                        return Err(TemplateError::BlockSplitConflict { index: i });
                    }
                    block_head_bindings.push(*def);
                }
                BlockSplit::Tail => {
                    if cross.start < row_cross.end {
                        return Err(TemplateError::BlockSplitConflict { index: i });
                    }
                    block_tail_bindings.push(*def);
                }
            }
        }

        for (i, line) in self.grid_lines.iter().enumerate() {
            let ok = match line.axis {
                LineAxis::Horizontal => {
                    line.anchor.y < rows && line.anchor.x + line.run <= columns
                }
                LineAxis::Vertical => line.anchor.x < columns && line.anchor.y + line.run <= rows,
            };
            if !ok {
                return Err(TemplateError::LineOutOfBounds { index: i });
            }
        }

        Ok(GridTemplate {
            orientation: self.orientation,
            flow_count: self.flow_count,
            column_sizings: self.column_sizings,
            row_sizings: self.row_sizings,
            frozen_left: self.frozen_left,
            frozen_right: self.frozen_right,
            frozen_top: self.frozen_top,
            frozen_bottom: self.frozen_bottom,
            stretch_column,
            stretch_row,
            scalar_bindings: self.scalar_bindings,
            row_bindings: self.row_bindings,
            block_head_bindings,
            block_tail_bindings,
            grid_lines: self.grid_lines,
            row_x,
            row_y,
        })
    }

    fn single_stretch(
        declared: &[usize],
        len: usize,
        axis: Axis,
    ) -> Result<Option<usize>, TemplateError> {
        match declared {
            [] => Ok(None),
            [index] => {
                if *index < len {
                    Ok(Some(*index))
                } else {
                    Err(TemplateError::StretchOutOfBounds { axis })
                }
            }
            _ => Err(TemplateError::MultipleStretch { axis }),
        }
    }

    fn span_union(ranges: impl Iterator<Item = Range<usize>>) -> Range<usize> {
        let mut union: Option<Range<usize>> = None;
        for range in ranges {
            union = Some(match union {
                None => range,
                Some(u) => u.start.min(range.start)..u.end.max(range.end),
            });
        }
        union.unwrap_or(0..0)
    }
}
