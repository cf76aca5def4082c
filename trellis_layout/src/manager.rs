// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout manager: realization, placement, scrolling, and grid lines.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use core::ops::Range;

use bitflags::bitflags;
use kurbo::{Point, Rect, Size};
use trellis_grid::{
    Clip, GridTemplate, LineAxis, LinePlacement, Orientation, PenId, Slot, TrackList, TrackSizing,
};
use trellis_rows::{RowManager, RowsChange, SelectMode};
use trellis_view::{ContainerView, ElementFactory};

use crate::error::RangeError;
use crate::extents::ContainerExtents;
use crate::figure::LineFigure;

bitflags! {
    /// What has changed since the last completed measure pass.
    ///
    /// Flags accumulate until the next pass completes; they are informational
    /// and do not change what the pass recomputes.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Invalidate: u8 {
        /// Rows were inserted, removed, or reloaded.
        const ROWS = 1 << 0;
        /// A scroll offset changed.
        const SCROLL = 1 << 1;
        /// The available viewport size changed.
        const VIEWPORT = 1 << 2;
        /// The template's runtime state must be rebuilt from scratch.
        const TEMPLATE = 1 << 3;
    }
}

/// Where the layout is in its recompute cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Validity {
    /// Geometry matches all inputs.
    Clean,
    /// An input changed; the next measure recomputes.
    Dirty,
    /// A measure pass is running right now.
    Measuring,
}

/// Tuning knobs for the layout manager.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Estimated extent of an auto main track in a container that has never
    /// been realized. Refined to the measured extent on first realization.
    pub fallback_auto_extent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fallback_auto_extent: 20.0,
        }
    }
}

/// Which band of an axis a track falls in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Zone {
    /// Leading frozen pane; never scrolls.
    FrozenHead,
    /// Scrolling band outside the row region.
    Scroll,
    /// The repeating row region.
    Row,
    /// Trailing frozen pane; pinned to the far viewport edge.
    FrozenTail,
}

/// Axis-agnostic geometry computed by the last measure pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Metrics {
    a_main: f64,
    a_cross: f64,
    /// Main-axis frozen head extent.
    m_head: f64,
    /// Main-axis frozen tail extent.
    m_tail: f64,
    /// Scrolling main-axis band before the container strip.
    m_pre: f64,
    /// Scrolling main-axis band after the container strip.
    m_post: f64,
    /// Total extent of the container strip.
    m_rows: f64,
    /// Scrollable main extent: pre + containers + post.
    m_extent: f64,
    /// Main-axis stretch growth.
    m_grow: f64,
    /// Cross-axis frozen head extent.
    c_head: f64,
    /// Cross-axis frozen tail extent.
    c_tail: f64,
    /// Cross extent of one flow slot of the row region.
    c_region_w: f64,
    /// Scrollable cross extent, all flow slots included.
    c_extent: f64,
    /// Cross-axis stretch growth.
    c_grow: f64,
}

/// One realized container plus its cached per-container measurements.
struct Realized<F: ElementFactory> {
    view: ContainerView<F>,
    /// Resolved lengths of the region's main tracks for this container.
    main_tracks: Vec<f64>,
    extent: f64,
}

impl<F: ElementFactory> Realized<F> {
    fn new(view: ContainerView<F>) -> Self {
        Self {
            view,
            main_tracks: Vec::new(),
            extent: 0.0,
        }
    }
}

/// Owns all layout state of one grid and answers every geometry question.
///
/// The manager realizes only the containers overlapping the scrollable band,
/// recycles them incrementally as the band moves, and resolves track lengths
/// lazily per measure pass. All geometry queries self-heal: if an input
/// changed since the last pass, the query runs the pass first.
///
/// Coordinates are viewport-relative. On the main axis the viewport is
/// `[frozen head][scrolling band][frozen tail]`; scrolled content slides
/// under the panes and clips against the band edges.
pub struct LayoutManager<F: ElementFactory> {
    template: GridTemplate,
    config: LayoutConfig,
    factory: F,
    rows: RowManager<F::Row>,
    column_tracks: TrackList,
    row_tracks: TrackList,
    extents: ContainerExtents,
    scalars: Vec<F::Element>,
    realized: VecDeque<Realized<F>>,
    first_realized: usize,
    h_offset: f64,
    v_offset: f64,
    available: Size,
    metrics: Metrics,
    validity: Validity,
    pending: Invalidate,
}

impl<F: ElementFactory> LayoutManager<F> {
    /// Creates a manager over a template, with no rows yet.
    pub fn new(template: GridTemplate, factory: F, config: LayoutConfig) -> Self {
        let column_tracks = template.column_track_list();
        let row_tracks = template.row_track_list();
        let estimate = {
            let main_list = match template.orientation() {
                Orientation::Vertical => &row_tracks,
                Orientation::Horizontal => &column_tracks,
            };
            template
                .row_main_range()
                .map(|t| match main_list.track(t).sizing() {
                    TrackSizing::Fixed(len) => len,
                    TrackSizing::Auto => config.fallback_auto_extent,
                    TrackSizing::Star(_) => 0.0,
                })
                .sum()
        };
        let flow = NonZeroUsize::new(template.flow_count()).unwrap_or(NonZeroUsize::MIN);
        Self {
            template,
            config,
            factory,
            rows: RowManager::new(flow),
            column_tracks,
            row_tracks,
            extents: ContainerExtents::new(estimate),
            scalars: Vec::new(),
            realized: VecDeque::new(),
            first_realized: 0,
            h_offset: 0.0,
            v_offset: 0.0,
            available: Size::ZERO,
            metrics: Metrics::default(),
            validity: Validity::Dirty,
            pending: Invalidate::empty(),
        }
    }

    /// The template this manager lays out.
    #[must_use]
    pub fn template(&self) -> &GridTemplate {
        &self.template
    }

    /// The host factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The host factory, mutably. Layout state is unaffected by factory edits.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// The row sequence and its current row and selection.
    #[must_use]
    pub fn rows(&self) -> &RowManager<F::Row> {
        &self.rows
    }

    /// Where the layout is in its recompute cycle.
    #[must_use]
    pub const fn validity(&self) -> Validity {
        self.validity
    }

    /// The accumulated invalidation reasons since the last completed pass.
    #[must_use]
    pub const fn pending(&self) -> Invalidate {
        self.pending
    }

    /// Marks the layout dirty for the given reason.
    ///
    /// [`Invalidate::TEMPLATE`] additionally releases every element and
    /// discards all accumulated measurements, so the next pass rebuilds the
    /// runtime state from the template alone.
    pub fn invalidate(&mut self, reason: Invalidate) {
        if reason.contains(Invalidate::TEMPLATE) {
            self.release_realized();
            self.release_scalars();
            self.column_tracks.reset_measured();
            self.row_tracks.reset_measured();
            self.extents.reset();
        }
        self.pending |= reason;
        self.validity = Validity::Dirty;
    }

    // Row sequence mutation.

    /// Replaces the whole row sequence.
    pub fn set_rows(&mut self, rows: Vec<F::Row>) {
        self.release_realized();
        let flow = NonZeroUsize::new(self.template.flow_count()).unwrap_or(NonZeroUsize::MIN);
        self.rows = RowManager::with_rows(rows, flow);
        self.extents.set_len(self.rows.container_count());
        self.extents.reset();
        self.pending |= Invalidate::ROWS;
        self.validity = Validity::Dirty;
    }

    /// Appends a row at the end of the sequence.
    pub fn push_row(&mut self, row: F::Row) {
        let change = self.rows.push(row);
        self.apply_rows_change(change);
    }

    /// Inserts a row at `at`, shifting later rows.
    pub fn insert_row(&mut self, at: usize, row: F::Row) {
        let change = self.rows.insert(at, row);
        self.apply_rows_change(change);
    }

    /// Removes and returns the row at `at`, shifting later rows.
    pub fn remove_row(&mut self, at: usize) -> F::Row {
        let (row, change) = self.rows.remove(at);
        self.apply_rows_change(change);
        row
    }

    /// Swaps the identity of the row at `at` without a position change.
    ///
    /// If the row is realized, only its own row slot is torn down and
    /// rebuilt; sibling slots and block-level elements are untouched.
    pub fn reload_row(&mut self, at: usize, row: F::Row) -> F::Row {
        let (old, change) = self.rows.replace(at, row);
        self.apply_rows_change(change);
        old
    }

    /// Reloads the current row, if there is one.
    pub fn reload_current_row(&mut self, row: F::Row) -> Option<F::Row> {
        let at = self.rows.current()?;
        Some(self.reload_row(at, row))
    }

    /// Moves the current-row pointer. Selection is unaffected.
    pub fn set_current_row(&mut self, index: Option<usize>) {
        self.rows.set_current(index);
    }

    /// Selects row `index` with the given mode and makes it current.
    pub fn select_row(&mut self, index: usize, mode: SelectMode) {
        self.rows.select(index, mode);
    }

    /// Pushes edited element state of every realized row back into the rows.
    pub fn flush_input(&mut self) {
        for item in &self.realized {
            let range = self.rows.rows_in_container(item.view.ordinal());
            item.view
                .flush_input(&mut self.factory, &mut self.rows.rows_mut()[range]);
        }
    }

    // Scrolling.

    /// Scrolls to the given offsets.
    ///
    /// A NaN component leaves that axis unchanged. Offsets clamp silently
    /// into `[0, extent - viewport]`; the upper bound is applied by the next
    /// measure pass, once extents are known.
    pub fn scroll_to(&mut self, horizontal: f64, vertical: f64) {
        let mut changed = false;
        if !horizontal.is_nan() {
            let horizontal = horizontal.max(0.0);
            if horizontal != self.h_offset {
                self.h_offset = horizontal;
                changed = true;
            }
        }
        if !vertical.is_nan() {
            let vertical = vertical.max(0.0);
            if vertical != self.v_offset {
                self.v_offset = vertical;
                changed = true;
            }
        }
        if changed {
            self.pending |= Invalidate::SCROLL;
            self.validity = Validity::Dirty;
        }
    }

    /// Current horizontal scroll offset, clamped.
    pub fn horizontal_offset(&mut self) -> f64 {
        self.ensure_measured();
        self.h_offset
    }

    /// Current vertical scroll offset, clamped.
    pub fn vertical_offset(&mut self) -> f64 {
        self.ensure_measured();
        self.v_offset
    }

    /// Width of the last measured viewport.
    #[must_use]
    pub const fn viewport_width(&self) -> f64 {
        self.available.width
    }

    /// Height of the last measured viewport.
    #[must_use]
    pub const fn viewport_height(&self) -> f64 {
        self.available.height
    }

    /// Total content width, frozen panes and stretch growth included.
    pub fn extent_width(&mut self) -> f64 {
        self.ensure_measured();
        match self.template.orientation() {
            Orientation::Vertical => self.cross_total(),
            Orientation::Horizontal => self.main_total(),
        }
    }

    /// Total content height, frozen panes and stretch growth included.
    pub fn extent_height(&mut self) -> f64 {
        self.ensure_measured();
        match self.template.orientation() {
            Orientation::Vertical => self.main_total(),
            Orientation::Horizontal => self.cross_total(),
        }
    }

    /// The contiguous ordinal range of realized containers.
    pub fn realized_range(&mut self) -> Range<usize> {
        self.ensure_measured();
        self.first_realized..self.first_realized + self.realized.len()
    }

    // The measure pass.

    /// Measures against `available` space and returns the desired size.
    ///
    /// Runs a full pass only when an input changed since the last one;
    /// measuring twice in a row produces no element traffic.
    pub fn measure(&mut self, available: Size) -> Size {
        if available != self.available {
            self.available = available;
            self.pending |= Invalidate::VIEWPORT;
            self.validity = Validity::Dirty;
        }
        self.ensure_measured();
        self.desired_size()
    }

    fn ensure_measured(&mut self) {
        if self.validity == Validity::Clean {
            return;
        }
        self.validity = Validity::Measuring;
        self.do_measure();
        self.validity = Validity::Clean;
        self.pending = Invalidate::empty();
    }

    fn do_measure(&mut self) {
        let orientation = self.template.orientation();
        let (a_main, a_cross) = match orientation {
            Orientation::Vertical => (self.available.height, self.available.width),
            Orientation::Horizontal => (self.available.width, self.available.height),
        };

        self.sync_scalars();
        self.measure_scalars();
        self.column_tracks.resolve(self.available.width);
        self.row_tracks.resolve(self.available.height);

        let count = self.rows.container_count();
        self.extents.set_len(count);

        // Window over the container strip, in strip coordinates, pre-clamped
        // against the estimated extent so a wild offset still lands on the
        // last containers.
        let (m_head, m_tail, m_pre, m_post) = self.main_bands();
        let band = (a_main - m_head - m_tail).max(0.0);
        let strip_est = self.extents.total();
        let max_offset_est = (m_head + m_pre + strip_est + m_post + m_tail - a_main).max(0.0);
        let offset_main = self.main_offset().min(max_offset_est);
        self.set_main_offset(offset_main);
        let window_start = offset_main - m_pre;
        let window_end = window_start + band;

        let mut old = core::mem::take(&mut self.realized);
        self.first_realized = 0;
        if count == 0 || band <= 0.0 {
            for item in old.drain(..) {
                item.view.cleanup(&mut self.factory);
            }
        } else {
            let mut start = self.extents.ordinal_at_offset(window_start);
            while start > 0 && self.extents.offset_of(start) > window_start {
                start -= 1;
            }
            while start + 1 < count
                && self.extents.offset_of(start) + self.extents.extent_of(start) <= window_start
            {
                start += 1;
            }
            while old.front().is_some_and(|item| item.view.ordinal() < start) {
                if let Some(item) = old.pop_front() {
                    item.view.cleanup(&mut self.factory);
                }
            }
            self.first_realized = start;
            let mut ordinal = start;
            loop {
                let reuse = old
                    .front()
                    .is_some_and(|item| item.view.ordinal() == ordinal);
                let reused = if reuse { old.pop_front() } else { None };
                let mut item = {
                    let range = self.rows.rows_in_container(ordinal);
                    let slice = &self.rows.rows()[range];
                    match reused {
                        Some(mut item) => {
                            if let ContainerView::Block(block) = &mut item.view
                                && block.count() != slice.len()
                            {
                                block.sync_rows(&mut self.factory, &self.template, slice);
                            }
                            item.view.refresh(&mut self.factory, slice);
                            item
                        }
                        None => Realized::new(ContainerView::setup(
                            &mut self.factory,
                            &self.template,
                            slice,
                            ordinal,
                        )),
                    }
                };
                self.measure_container(&mut item);
                self.extents.set_extent(ordinal, item.extent);
                self.realized.push_back(item);
                let end = self.extents.offset_of(ordinal) + self.extents.extent_of(ordinal);
                ordinal += 1;
                if ordinal >= count || end >= window_end {
                    break;
                }
            }
            for item in old.drain(..) {
                item.view.cleanup(&mut self.factory);
            }
        }

        // Container measurement may have fed auto tracks; resolve once more
        // so offsets match what was just measured.
        self.column_tracks.resolve(self.available.width);
        self.row_tracks.resolve(self.available.height);

        let (m_head, m_tail, m_pre, m_post) = self.main_bands();
        let m_rows = self.extents.total();
        let m_extent = m_pre + m_rows + m_post;
        let band = (a_main - m_head - m_tail).max(0.0);
        let m_grow = if self.main_list().stretch().is_some() {
            (band - m_extent).max(0.0)
        } else {
            0.0
        };

        let cross_list = self.cross_list();
        let region_cross = self.template.row_cross_range();
        let c_head = cross_list.frozen_head_extent();
        let c_tail = cross_list.frozen_tail_extent();
        let c_region_w =
            cross_list.offset_of(region_cross.end) - cross_list.offset_of(region_cross.start);
        let c_scroll = cross_list.offset_of(cross_list.len() - cross_list.frozen_tail())
            - cross_list.offset_of(cross_list.frozen_head());
        let flow = self.template.flow_count();
        let c_extent = c_scroll + (flow - 1) as f64 * c_region_w;
        let c_band = (a_cross - c_head - c_tail).max(0.0);
        let c_grow = if cross_list.stretch().is_some() {
            (c_band - c_extent).max(0.0)
        } else {
            0.0
        };

        self.metrics = Metrics {
            a_main,
            a_cross,
            m_head,
            m_tail,
            m_pre,
            m_post,
            m_rows,
            m_extent,
            m_grow,
            c_head,
            c_tail,
            c_region_w,
            c_extent,
            c_grow,
        };

        let max_main = (self.main_total() - a_main).max(0.0);
        let max_cross = (self.cross_total() - a_cross).max(0.0);
        self.set_main_offset(self.main_offset().clamp(0.0, max_main));
        self.set_cross_offset(self.cross_offset().clamp(0.0, max_cross));
    }

    /// Creates missing scalar elements, or refreshes existing ones.
    fn sync_scalars(&mut self) {
        if self.scalars.is_empty() {
            for i in 0..self.template.scalar_bindings().len() {
                let element = self.factory.create(Slot::Scalar(i), None);
                self.scalars.push(element);
            }
        } else {
            for (i, element) in self.scalars.iter_mut().enumerate() {
                self.factory.refresh(Slot::Scalar(i), None, element);
            }
        }
    }

    /// Feeds scalar element measurements into auto tracks on both axes.
    fn measure_scalars(&mut self) {
        let template = &self.template;
        let factory = &mut self.factory;
        let column_tracks = &mut self.column_tracks;
        let row_tracks = &mut self.row_tracks;
        for (i, element) in self.scalars.iter().enumerate() {
            let Some(def) = template.binding(Slot::Scalar(i)) else {
                continue;
            };
            let size = factory.measure(Slot::Scalar(i), element);
            feed_auto(column_tracks, def.span.x_range(), size.width);
            feed_auto(row_tracks, def.span.y_range(), size.height);
        }
    }

    /// Measures one container's elements, feeding cross-axis auto tracks
    /// globally and main-axis auto tracks per container.
    fn measure_container(&mut self, item: &mut Realized<F>) {
        let vertical = self.template.orientation() == Orientation::Vertical;
        let region = self.template.row_main_range();
        // Seed the container's main tracks from the global resolution; auto
        // tracks start at zero and take this container's maximum below.
        let (mut lengths, autos): (Vec<f64>, Vec<bool>) = {
            let main_list = if vertical {
                &self.row_tracks
            } else {
                &self.column_tracks
            };
            region
                .clone()
                .map(|t| match main_list.track(t).sizing() {
                    TrackSizing::Fixed(len) => (len, false),
                    TrackSizing::Auto => (0.0, true),
                    TrackSizing::Star(_) => (main_list.len_of(t), false),
                })
                .unzip()
        };
        let template = &self.template;
        let factory = &mut self.factory;
        let cross_list = if vertical {
            &mut self.column_tracks
        } else {
            &mut self.row_tracks
        };
        item.view.visit_elements(&mut |slot, _flow_slot, element| {
            let Some(def) = template.binding(slot) else {
                return;
            };
            let size = factory.measure(slot, element);
            let (main_range, cross_range, main_size, cross_size) = if vertical {
                (def.span.y_range(), def.span.x_range(), size.height, size.width)
            } else {
                (def.span.x_range(), def.span.y_range(), size.width, size.height)
            };
            if main_range.len() == 1 && region.contains(&main_range.start) {
                let i = main_range.start - region.start;
                if autos[i] && main_size > lengths[i] {
                    lengths[i] = main_size;
                }
            }
            feed_auto(cross_list, cross_range, cross_size);
        });
        item.extent = lengths.iter().sum();
        item.main_tracks = lengths;
    }

    // Geometry queries.

    /// Viewport rectangle of one container: the full row region of all its
    /// flow slots.
    pub fn container_rect(&mut self, ordinal: usize) -> Result<Rect, RangeError> {
        self.ensure_measured();
        self.check_ordinal(ordinal)?;
        let main_p = self.container_main_pos(ordinal);
        let main_e = self.extents.extent_of(ordinal);
        let (cross_p, _) = self.cross_span(self.template.row_cross_range(), 0);
        let cross_e = self.metrics.c_region_w * self.template.flow_count() as f64;
        Ok(self.rect_from(main_p, main_e, cross_p, cross_e))
    }

    /// How much of one container is hidden behind the frozen panes or
    /// viewport edges. Infinite on a side means fully hidden there.
    pub fn container_clip(&mut self, ordinal: usize) -> Result<Clip, RangeError> {
        let rect = self.container_rect(ordinal)?;
        let region_cross = self.template.row_cross_range();
        let cross_scrolls = matches!(
            self.cross_zone(region_cross.start),
            Zone::Scroll | Zone::Row
        );
        Ok(self.clip_from(rect, true, cross_scrolls))
    }

    /// Viewport rectangle of one element.
    ///
    /// `ordinal` and `flow_slot` are ignored for scalar slots; `flow_slot` is
    /// ignored for block slots.
    pub fn element_rect(
        &mut self,
        ordinal: usize,
        flow_slot: usize,
        slot: Slot,
    ) -> Result<Rect, RangeError> {
        self.ensure_measured();
        let span = self
            .template
            .binding(slot)
            .ok_or(RangeError::UnknownSlot { slot })?
            .span;
        let main_range = self.template.main_range(span);
        let cross_range = self.template.cross_range(span);
        match slot {
            Slot::Scalar(_) => {
                let (main_p, main_e) = self.main_span_scalar(main_range);
                let (cross_p, cross_e) = self.cross_span(cross_range, 0);
                Ok(self.rect_from(main_p, main_e, cross_p, cross_e))
            }
            Slot::Row(_) => {
                self.check_ordinal(ordinal)?;
                let filled = self.rows.rows_in_container(ordinal).len();
                if flow_slot >= filled {
                    return Err(RangeError::FlowSlotOutOfRange {
                        flow_slot,
                        count: filled,
                    });
                }
                let base = self.container_main_pos(ordinal);
                let (intra, main_e) = self.intra_main_span(ordinal, main_range);
                let (cross_p, cross_e) = self.cross_span(cross_range, flow_slot);
                Ok(self.rect_from(base + intra, main_e, cross_p, cross_e))
            }
            Slot::BlockHead(_) | Slot::BlockTail(_) => {
                self.check_ordinal(ordinal)?;
                let base = self.container_main_pos(ordinal);
                let (intra, main_e) = self.intra_main_span(ordinal, main_range);
                let (cross_p, cross_e) = self.cross_span(cross_range, 0);
                Ok(self.rect_from(base + intra, main_e, cross_p, cross_e))
            }
        }
    }

    /// How much of one element is hidden behind the frozen panes or viewport
    /// edges. Frozen and pinned elements are never clipped; a fully hidden
    /// element reports an infinite inset on the hiding side.
    pub fn element_clip(
        &mut self,
        ordinal: usize,
        flow_slot: usize,
        slot: Slot,
    ) -> Result<Clip, RangeError> {
        let rect = self.element_rect(ordinal, flow_slot, slot)?;
        let span = self
            .template
            .binding(slot)
            .ok_or(RangeError::UnknownSlot { slot })?
            .span;
        let main_range = self.template.main_range(span);
        let cross_range = self.template.cross_range(span);
        let main_scrolls = matches!(self.main_zone(main_range.start), Zone::Scroll | Zone::Row);
        let cross_scrolls = matches!(self.cross_zone(cross_range.start), Zone::Scroll | Zone::Row);
        Ok(self.clip_from(rect, main_scrolls, cross_scrolls))
    }

    /// Computes every visible grid line segment for the current pass.
    ///
    /// Lines anchored in the row region repeat per realized container (and
    /// per flow slot on the cross axis); lines in frozen panes do not scroll.
    /// Segments scrolled entirely out of the band are dropped.
    pub fn grid_line_figures(&mut self) -> Vec<LineFigure> {
        self.ensure_measured();
        let vertical = self.template.orientation() == Orientation::Vertical;
        let defs: Vec<_> = self.template.grid_lines().to_vec();
        let mut figures = Vec::new();
        for def in defs {
            let tail = def.placement == LinePlacement::Tail;
            // Decompose the grid-space declaration into main/cross terms.
            let (along_main, perp_track, along_start) = match def.axis {
                LineAxis::Horizontal => (!vertical, def.anchor.y, def.anchor.x),
                LineAxis::Vertical => (vertical, def.anchor.x, def.anchor.y),
            };
            let perp_edge = if tail { perp_track + 1 } else { perp_track };
            let along = along_start..along_start + def.run;
            if along_main {
                self.emit_main_running_line(&mut figures, perp_track, perp_edge, along, def.pen);
            } else {
                self.emit_cross_running_line(&mut figures, perp_track, perp_edge, along, def.pen);
            }
        }
        figures
    }

    /// Emits a line running along the cross axis (a row separator, say).
    fn emit_cross_running_line(
        &mut self,
        out: &mut Vec<LineFigure>,
        perp_track: usize,
        perp_edge: usize,
        along: Range<usize>,
        pen: PenId,
    ) {
        let m = self.metrics;
        let perp_zone = self.main_zone(perp_track);
        let main_scrolls = matches!(perp_zone, Zone::Scroll | Zone::Row);
        let mut positions = Vec::new();
        if perp_zone == Zone::Row {
            for ordinal in self.realized_range() {
                positions.push(self.main_edge_in_container(ordinal, perp_edge));
            }
        } else {
            positions.push(self.main_edge_scalar(perp_edge));
        }

        let region_cross = self.template.row_cross_range();
        let in_region = along.start >= region_cross.start && along.end <= region_cross.end;
        let slots = if in_region {
            self.template.flow_count()
        } else {
            1
        };
        let run_extent = {
            let list = self.cross_list();
            list.offset_of(along.end) - list.offset_of(along.start)
        };
        let cross_scrolls = matches!(self.cross_zone(along.start), Zone::Scroll | Zone::Row);
        let (c_lo, c_hi) = if cross_scrolls {
            (m.c_head, m.a_cross - m.c_tail)
        } else {
            (0.0, m.a_cross)
        };

        for p in positions {
            if main_scrolls && (p < m.m_head || p > m.a_main - m.m_tail) {
                continue;
            }
            if p < 0.0 || p > m.a_main {
                continue;
            }
            for j in 0..slots {
                let c0 = self.cross_edge(along.start, j, in_region);
                let c1 = if in_region {
                    c0 + run_extent
                } else {
                    self.cross_edge(along.end, j, in_region)
                };
                let (c0, c1) = (c0.max(c_lo), c1.min(c_hi));
                if c1 <= c0 {
                    continue;
                }
                out.push(LineFigure {
                    from: self.figure_point(p, c0),
                    to: self.figure_point(p, c1),
                    pen,
                });
            }
        }
    }

    /// Emits a line running along the main axis (a column rule, say).
    fn emit_main_running_line(
        &mut self,
        out: &mut Vec<LineFigure>,
        perp_track: usize,
        perp_edge: usize,
        along: Range<usize>,
        pen: PenId,
    ) {
        let m = self.metrics;
        let perp_zone = self.cross_zone(perp_track);
        let cross_scrolls = matches!(perp_zone, Zone::Scroll | Zone::Row);
        let perp_in_region = perp_zone == Zone::Row;
        let slots = if perp_in_region {
            self.template.flow_count()
        } else {
            1
        };

        let region_main = self.template.row_main_range();
        let in_region = along.start >= region_main.start && along.end <= region_main.end;
        let mut segments = Vec::new();
        if in_region {
            for ordinal in self.realized_range() {
                let p0 = self.main_edge_in_container(ordinal, along.start);
                let p1 = self.main_edge_in_container(ordinal, along.end);
                segments.push((p0, p1));
            }
        } else {
            segments.push((
                self.main_edge_scalar(along.start),
                self.main_edge_scalar(along.end),
            ));
        }
        let main_scrolls = in_region || matches!(self.main_zone(along.start), Zone::Scroll);
        let (m_lo, m_hi) = if main_scrolls {
            (m.m_head, m.a_main - m.m_tail)
        } else {
            (0.0, m.a_main)
        };

        for j in 0..slots {
            let c = self.cross_edge(perp_edge, j, perp_in_region);
            if cross_scrolls && (c < m.c_head || c > m.a_cross - m.c_tail) {
                continue;
            }
            if c < 0.0 || c > m.a_cross {
                continue;
            }
            for &(p0, p1) in &segments {
                let (p0, p1) = (p0.max(m_lo), p1.min(m_hi));
                if p1 <= p0 {
                    continue;
                }
                out.push(LineFigure {
                    from: self.figure_point(p0, c),
                    to: self.figure_point(p1, c),
                    pen,
                });
            }
        }
    }

    // Internal change plumbing.

    /// Releases realized containers invalidated by a row mutation and marks
    /// the layout dirty. Containers before the first affected ordinal keep
    /// their elements; reloads swap a single row slot in place.
    fn apply_rows_change(&mut self, change: RowsChange) {
        let flow = self.rows.flow_count();
        if let RowsChange::Reloaded { at } = change {
            let ordinal = at / flow;
            let first = self.first_realized;
            if ordinal >= first && ordinal < first + self.realized.len() {
                let idx = ordinal - first;
                let is_block = matches!(
                    self.realized.get(idx).map(|item| &item.view),
                    Some(ContainerView::Block(_))
                );
                if is_block {
                    if let Some(row) = self.rows.get(at)
                        && let Some(item) = self.realized.get_mut(idx)
                        && let ContainerView::Block(block) = &mut item.view
                    {
                        block.reload_row(&mut self.factory, &self.template, at % flow, row);
                    }
                } else {
                    // A single-row container is its one row; rebuild it.
                    if let Some(old) = self.realized.remove(idx) {
                        old.view.cleanup(&mut self.factory);
                    }
                    let range = self.rows.rows_in_container(ordinal);
                    let slice = &self.rows.rows()[range];
                    let view =
                        ContainerView::setup(&mut self.factory, &self.template, slice, ordinal);
                    self.realized.insert(idx, Realized::new(view));
                }
            }
        } else {
            let affected = change.first_affected_ordinal(flow);
            if affected <= self.first_realized {
                self.release_realized();
            } else {
                while self.first_realized + self.realized.len() > affected {
                    match self.realized.pop_back() {
                        Some(item) => item.view.cleanup(&mut self.factory),
                        None => break,
                    }
                }
            }
            self.extents.set_len(self.rows.container_count());
        }
        self.pending |= Invalidate::ROWS;
        self.validity = Validity::Dirty;
    }

    /// Releases every realized container, newest first.
    fn release_realized(&mut self) {
        while let Some(item) = self.realized.pop_back() {
            item.view.cleanup(&mut self.factory);
        }
        self.first_realized = 0;
    }

    /// Releases every scalar element, in reverse creation order.
    fn release_scalars(&mut self) {
        while let Some(element) = self.scalars.pop() {
            self.factory.release(Slot::Scalar(self.scalars.len()), element);
        }
    }

    // Axis plumbing.

    fn main_list(&self) -> &TrackList {
        match self.template.orientation() {
            Orientation::Vertical => &self.row_tracks,
            Orientation::Horizontal => &self.column_tracks,
        }
    }

    fn cross_list(&self) -> &TrackList {
        match self.template.orientation() {
            Orientation::Vertical => &self.column_tracks,
            Orientation::Horizontal => &self.row_tracks,
        }
    }

    fn main_offset(&self) -> f64 {
        match self.template.orientation() {
            Orientation::Vertical => self.v_offset,
            Orientation::Horizontal => self.h_offset,
        }
    }

    fn cross_offset(&self) -> f64 {
        match self.template.orientation() {
            Orientation::Vertical => self.h_offset,
            Orientation::Horizontal => self.v_offset,
        }
    }

    fn set_main_offset(&mut self, offset: f64) {
        match self.template.orientation() {
            Orientation::Vertical => self.v_offset = offset,
            Orientation::Horizontal => self.h_offset = offset,
        }
    }

    fn set_cross_offset(&mut self, offset: f64) {
        match self.template.orientation() {
            Orientation::Vertical => self.h_offset = offset,
            Orientation::Horizontal => self.v_offset = offset,
        }
    }

    /// Frozen head/tail extents and the scrolled bands around the strip.
    fn main_bands(&self) -> (f64, f64, f64, f64) {
        let list = self.main_list();
        let region = self.template.row_main_range();
        let head = list.frozen_head_extent();
        let tail = list.frozen_tail_extent();
        let pre = list.offset_of(region.start) - list.offset_of(list.frozen_head());
        let post = list.offset_of(list.len() - list.frozen_tail()) - list.offset_of(region.end);
        (head, tail, pre, post)
    }

    fn main_total(&self) -> f64 {
        let m = &self.metrics;
        m.m_head + m.m_extent + m.m_grow + m.m_tail
    }

    fn cross_total(&self) -> f64 {
        let m = &self.metrics;
        m.c_head + m.c_extent + m.c_grow + m.c_tail
    }

    fn main_zone(&self, track: usize) -> Zone {
        let list = self.main_list();
        if track < list.frozen_head() {
            Zone::FrozenHead
        } else if track >= list.len() - list.frozen_tail() {
            Zone::FrozenTail
        } else if self.template.row_main_range().contains(&track) {
            Zone::Row
        } else {
            Zone::Scroll
        }
    }

    fn cross_zone(&self, track: usize) -> Zone {
        let list = self.cross_list();
        if track < list.frozen_head() {
            Zone::FrozenHead
        } else if track >= list.len() - list.frozen_tail() {
            Zone::FrozenTail
        } else if self.template.row_cross_range().contains(&track) {
            Zone::Row
        } else {
            Zone::Scroll
        }
    }

    fn check_ordinal(&self, ordinal: usize) -> Result<(), RangeError> {
        let count = self.rows.container_count();
        if ordinal < count {
            Ok(())
        } else {
            Err(RangeError::OrdinalOutOfRange { ordinal, count })
        }
    }

    /// Viewport main position of the start of container `ordinal`.
    fn container_main_pos(&mut self, ordinal: usize) -> f64 {
        let strip = self.extents.offset_of(ordinal);
        let m = &self.metrics;
        m.m_head + m.m_pre + strip - self.main_offset()
    }

    /// Per-container main tracks measured for a realized container.
    fn region_lengths(&self, ordinal: usize) -> Option<&[f64]> {
        let idx = ordinal.checked_sub(self.first_realized)?;
        self.realized.get(idx).map(|item| item.main_tracks.as_slice())
    }

    /// Offset and extent of a main-axis span inside one container, using the
    /// container's own measured tracks when it is realized.
    fn intra_main_span(&self, ordinal: usize, range: Range<usize>) -> (f64, f64) {
        let region = self.template.row_main_range();
        if range.start >= region.start && range.end <= region.end {
            if let Some(lengths) = self.region_lengths(ordinal) {
                let s = range.start - region.start;
                let e = (range.end - region.start).min(lengths.len());
                let offset: f64 = lengths[..s.min(lengths.len())].iter().sum();
                let extent: f64 = lengths[s.min(e)..e].iter().sum();
                return (offset, extent);
            }
        }
        let list = self.main_list();
        (
            list.offset_of(range.start) - list.offset_of(region.start),
            list.offset_of(range.end) - list.offset_of(range.start),
        )
    }

    /// Viewport main position and extent of a span outside the row region.
    fn main_span_scalar(&self, range: Range<usize>) -> (f64, f64) {
        let list = self.main_list();
        let extent = list.offset_of(range.end) - list.offset_of(range.start);
        (self.main_edge_scalar(range.start), extent)
    }

    /// Viewport main position of a track edge outside the row region.
    ///
    /// Edges inside the region belong to individual containers; see
    /// [`Self::main_edge_in_container`].
    fn main_edge_scalar(&self, edge: usize) -> f64 {
        let list = self.main_list();
        let m = &self.metrics;
        let region = self.template.row_main_range();
        let head = list.frozen_head();
        let tail_start = list.len() - list.frozen_tail();
        if list.frozen_head() > 0 && edge <= head {
            return list.offset_of(edge);
        }
        if list.frozen_tail() > 0 && edge >= tail_start {
            return m.a_main - m.m_tail + (list.offset_of(edge) - list.offset_of(tail_start));
        }
        if edge <= region.start {
            m.m_head + (list.offset_of(edge) - list.offset_of(head)) - self.main_offset()
        } else {
            m.m_head + m.m_pre + m.m_rows + (list.offset_of(edge) - list.offset_of(region.end))
                + m.m_grow
                - self.main_offset()
        }
    }

    /// Viewport main position of a region track edge within one container.
    fn main_edge_in_container(&mut self, ordinal: usize, edge: usize) -> f64 {
        let base = self.container_main_pos(ordinal);
        let region = self.template.row_main_range();
        let upto = edge.saturating_sub(region.start);
        let intra = match self.region_lengths(ordinal) {
            Some(lengths) => lengths.iter().take(upto).sum(),
            None => {
                let list = self.main_list();
                list.offset_of(edge) - list.offset_of(region.start)
            }
        };
        base + intra
    }

    /// Viewport cross position and extent of a span, for the given flow slot.
    fn cross_span(&self, range: Range<usize>, flow_slot: usize) -> (f64, f64) {
        let list = self.cross_list();
        let extent = list.offset_of(range.end) - list.offset_of(range.start);
        let in_region = self.cross_zone(range.start) == Zone::Row;
        (self.cross_edge(range.start, flow_slot, in_region), extent)
    }

    /// Viewport cross position of a track edge.
    ///
    /// `in_region` selects the flow-slot interpretation for edges on the
    /// region boundary, which are shared with the adjacent scrolled bands.
    fn cross_edge(&self, edge: usize, flow_slot: usize, in_region: bool) -> f64 {
        let list = self.cross_list();
        let m = &self.metrics;
        let region = self.template.row_cross_range();
        let head = list.frozen_head();
        let tail_start = list.len() - list.frozen_tail();
        if in_region {
            let content = (list.offset_of(region.start) - list.offset_of(head))
                + flow_slot as f64 * m.c_region_w
                + (list.offset_of(edge) - list.offset_of(region.start));
            return m.c_head + content - self.cross_offset();
        }
        if list.frozen_head() > 0 && edge <= head {
            return list.offset_of(edge);
        }
        if list.frozen_tail() > 0 && edge >= tail_start {
            return m.a_cross - m.c_tail + (list.offset_of(edge) - list.offset_of(tail_start));
        }
        let content = if edge <= region.start {
            list.offset_of(edge) - list.offset_of(head)
        } else {
            (list.offset_of(edge) - list.offset_of(head))
                + (self.template.flow_count() - 1) as f64 * m.c_region_w
                + m.c_grow
        };
        m.c_head + content - self.cross_offset()
    }

    /// Packs main/cross coordinates into a viewport rectangle.
    fn rect_from(&self, main_p: f64, main_e: f64, cross_p: f64, cross_e: f64) -> Rect {
        match self.template.orientation() {
            Orientation::Vertical => Rect::new(cross_p, main_p, cross_p + cross_e, main_p + main_e),
            Orientation::Horizontal => {
                Rect::new(main_p, cross_p, main_p + main_e, cross_p + cross_e)
            }
        }
    }

    fn figure_point(&self, main: f64, cross: f64) -> Point {
        match self.template.orientation() {
            Orientation::Vertical => Point::new(cross, main),
            Orientation::Horizontal => Point::new(main, cross),
        }
    }

    /// Clips a rectangle against the scrollable band on each scrolling axis.
    fn clip_from(&self, rect: Rect, main_scrolls: bool, cross_scrolls: bool) -> Clip {
        let m = &self.metrics;
        let (main0, main1, cross0, cross1) = match self.template.orientation() {
            Orientation::Vertical => (rect.y0, rect.y1, rect.x0, rect.x1),
            Orientation::Horizontal => (rect.x0, rect.x1, rect.y0, rect.y1),
        };
        let (main_near, main_far) = if main_scrolls {
            band_clip(main0, main1, m.m_head, m.a_main - m.m_tail)
        } else {
            (0.0, 0.0)
        };
        let (cross_near, cross_far) = if cross_scrolls {
            band_clip(cross0, cross1, m.c_head, m.a_cross - m.c_tail)
        } else {
            (0.0, 0.0)
        };
        match self.template.orientation() {
            Orientation::Vertical => Clip::new(cross_near, main_near, cross_far, main_far),
            Orientation::Horizontal => Clip::new(main_near, cross_near, main_far, cross_far),
        }
    }

    fn desired_size(&self) -> Size {
        let m = &self.metrics;
        let main = if self.main_list().stretch().is_some() {
            m.a_main
        } else {
            self.main_total().min(m.a_main)
        };
        let cross = if self.cross_list().stretch().is_some() {
            m.a_cross
        } else {
            self.cross_total().min(m.a_cross)
        };
        match self.template.orientation() {
            Orientation::Vertical => Size::new(cross, main),
            Orientation::Horizontal => Size::new(main, cross),
        }
    }
}

impl<F: ElementFactory> fmt::Debug for LayoutManager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutManager")
            .field("first_realized", &self.first_realized)
            .field("realized", &self.realized.len())
            .field("h_offset", &self.h_offset)
            .field("v_offset", &self.v_offset)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// Feeds a content measurement into a single-track auto span.
///
/// Multi-track spans do not size auto tracks; their content is presumed to
/// fit the tracks it straddles.
fn feed_auto(list: &mut TrackList, range: Range<usize>, extent: f64) {
    if range.len() == 1 && matches!(list.track(range.start).sizing(), TrackSizing::Auto) {
        list.set_measured(range.start, extent);
    }
}

/// Near/far insets of `[p0, p1)` against the band `[start, end)`; infinite
/// when the interval is entirely outside.
fn band_clip(p0: f64, p1: f64, start: f64, end: f64) -> (f64, f64) {
    if p1 <= start {
        return (f64::INFINITY, 0.0);
    }
    if p0 >= end {
        return (0.0, f64::INFINITY);
    }
    ((start - p0).max(0.0), (p1 - end).max(0.0))
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::num::NonZeroUsize;

    use kurbo::{Rect, Size};
    use trellis_grid::{
        BlockSplit, GridPoint, GridSpan, GridTemplate, LineAxis, LinePlacement, Orientation, PenId,
        Slot, TrackSizing,
    };
    use trellis_view::ElementFactory;

    use super::{LayoutConfig, LayoutManager, Validity};
    use crate::error::RangeError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Create(Slot),
        Release(Slot),
    }

    /// Counts lifecycle traffic; elements are serial ids.
    #[derive(Default)]
    struct Recorder {
        log: Vec<Event>,
        next_id: u32,
    }

    impl Recorder {
        fn creates(&self) -> usize {
            self.log
                .iter()
                .filter(|e| matches!(e, Event::Create(_)))
                .count()
        }

        fn releases(&self) -> usize {
            self.log
                .iter()
                .filter(|e| matches!(e, Event::Release(_)))
                .count()
        }
    }

    impl ElementFactory for Recorder {
        type Row = u32;
        type Element = u32;

        fn create(&mut self, slot: Slot, _row: Option<&u32>) -> u32 {
            self.log.push(Event::Create(slot));
            self.next_id += 1;
            self.next_id
        }

        fn refresh(&mut self, _slot: Slot, _row: Option<&u32>, _element: &mut u32) {}

        fn release(&mut self, slot: Slot, _element: u32) {
            self.log.push(Event::Release(slot));
        }

        fn flush_input(&mut self, _slot: Slot, row: &mut u32, element: &u32) {
            *row = *element;
        }
    }

    /// Elements carry their row value; rows encode their own desired height.
    #[derive(Default)]
    struct Sizer;

    impl ElementFactory for Sizer {
        type Row = u32;
        type Element = u32;

        fn create(&mut self, _slot: Slot, row: Option<&u32>) -> u32 {
            row.copied().unwrap_or(0)
        }

        fn refresh(&mut self, _slot: Slot, row: Option<&u32>, element: &mut u32) {
            if let Some(row) = row {
                *element = *row;
            }
        }

        fn release(&mut self, _slot: Slot, _element: u32) {}

        fn measure(&mut self, _slot: Slot, element: &u32) -> Size {
            Size::new(40.0, f64::from(*element))
        }
    }

    /// One fixed row track, one star column, nothing frozen.
    fn plain_template(row_extent: f64) -> GridTemplate {
        GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(50.0)])
            .rows([TrackSizing::Fixed(row_extent)])
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .build()
            .unwrap()
    }

    /// Frozen header and footer scalars around a fixed row region.
    fn framed_template() -> GridTemplate {
        GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Star(1.0)])
            .rows([
                TrackSizing::Fixed(10.0),
                TrackSizing::Fixed(20.0),
                TrackSizing::Fixed(10.0),
            ])
            .frozen_top(1)
            .frozen_bottom(1)
            .row_binding(GridSpan::cell(GridPoint::new(0, 1)))
            .scalar_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .scalar_binding(GridSpan::cell(GridPoint::new(0, 2)))
            .build()
            .unwrap()
    }

    fn layout_with_rows(template: GridTemplate, rows: Vec<u32>) -> LayoutManager<Recorder> {
        let mut layout = LayoutManager::new(template, Recorder::default(), LayoutConfig::default());
        layout.set_rows(rows);
        layout
    }

    #[test]
    fn fixed_rows_realize_to_fill_the_band() {
        let mut layout = layout_with_rows(framed_template(), vec![0; 9]);
        layout.measure(Size::new(100.0, 100.0));

        // A 10px frozen header and footer leave an 80px band: four rows.
        assert_eq!(layout.realized_range(), 0..4);
        assert_eq!(layout.extent_height(), 200.0);
        assert_eq!(layout.extent_width(), 100.0);

        let rect = layout.element_rect(0, 0, Slot::Row(0)).unwrap();
        assert_eq!(rect, Rect::new(0.0, 10.0, 100.0, 30.0));
        for ordinal in 0..4 {
            assert!(layout.element_clip(ordinal, 0, Slot::Row(0)).unwrap().is_none());
        }

        // The frozen scalars sit at the viewport edges, unclipped.
        let header = layout.element_rect(0, 0, Slot::Scalar(0)).unwrap();
        assert_eq!(header, Rect::new(0.0, 0.0, 100.0, 10.0));
        let footer = layout.element_rect(0, 0, Slot::Scalar(1)).unwrap();
        assert_eq!(footer, Rect::new(0.0, 90.0, 100.0, 100.0));
        assert!(layout.element_clip(0, 0, Slot::Scalar(1)).unwrap().is_none());
    }

    #[test]
    fn scrolled_rows_clip_against_the_frozen_panes() {
        let mut layout = layout_with_rows(framed_template(), vec![0; 9]);
        layout.measure(Size::new(100.0, 100.0));
        layout.scroll_to(f64::NAN, 10.0);
        layout.measure(Size::new(100.0, 100.0));

        assert_eq!(layout.realized_range(), 0..5);

        // Row 0 slid 10px under the header; row 4 pokes 10px under the footer.
        let top = layout.element_clip(0, 0, Slot::Row(0)).unwrap();
        assert_eq!(top.top, 10.0);
        assert_eq!(top.bottom, 0.0);
        let bottom = layout.element_clip(4, 0, Slot::Row(0)).unwrap();
        assert_eq!(bottom.top, 0.0);
        assert_eq!(bottom.bottom, 10.0);

        // The frozen scalars do not move.
        let header = layout.element_rect(0, 0, Slot::Scalar(0)).unwrap();
        assert_eq!(header, Rect::new(0.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn fully_scrolled_out_rows_report_an_infinite_clip() {
        let mut layout = layout_with_rows(framed_template(), vec![0; 9]);
        layout.measure(Size::new(100.0, 100.0));
        layout.scroll_to(f64::NAN, 40.0);
        layout.measure(Size::new(100.0, 100.0));

        // Row 0 now ends at viewport 10.0, exactly the band start.
        let clip = layout.element_clip(0, 0, Slot::Row(0)).unwrap();
        assert!(clip.top.is_infinite());
        assert!(clip.is_hidden());
    }

    #[test]
    fn measure_is_idempotent_without_changes() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        let first = layout.measure(Size::new(100.0, 100.0));
        let range = layout.realized_range();
        let rect = layout.element_rect(2, 0, Slot::Row(0)).unwrap();

        layout.factory_mut().log.clear();
        let second = layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.validity(), Validity::Clean);
        assert_eq!(first, second);
        assert_eq!(layout.realized_range(), range);
        assert_eq!(layout.element_rect(2, 0, Slot::Row(0)).unwrap(), rect);
        assert!(layout.factory().log.is_empty());
    }

    #[test]
    fn scrolling_recycles_overlapping_containers() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 0..5);

        layout.factory_mut().log.clear();
        layout.scroll_to(f64::NAN, 40.0);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 2..7);

        // Rows 2..5 are kept; only the delta is created and released.
        assert_eq!(layout.factory().creates(), 2);
        assert_eq!(layout.factory().releases(), 2);
    }

    #[test]
    fn scroll_offsets_clamp_to_the_extent() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));

        layout.scroll_to(f64::NAN, 1e6);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.vertical_offset(), 100.0);
        assert_eq!(layout.realized_range(), 5..10);

        layout.scroll_to(f64::NAN, -5.0);
        assert_eq!(layout.vertical_offset(), 0.0);
    }

    #[test]
    fn nan_scroll_leaves_the_axis_unchanged() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));
        layout.scroll_to(f64::NAN, 30.0);
        layout.measure(Size::new(100.0, 100.0));

        layout.scroll_to(f64::NAN, f64::NAN);
        assert_eq!(layout.validity(), Validity::Clean);
        assert_eq!(layout.vertical_offset(), 30.0);
        assert_eq!(layout.horizontal_offset(), 0.0);
    }

    #[test]
    fn empty_row_sequence_has_no_containers() {
        let mut layout = layout_with_rows(plain_template(20.0), vec![]);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 0..0);
        assert_eq!(layout.extent_height(), 0.0);
        assert_eq!(
            layout.container_rect(0),
            Err(RangeError::OrdinalOutOfRange {
                ordinal: 0,
                count: 0
            })
        );
    }

    #[test]
    fn auto_rows_measure_per_container() {
        let template = GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(40.0)])
            .rows([TrackSizing::Auto])
            .flow_count(NonZeroUsize::new(2).unwrap())
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .build()
            .unwrap();
        let mut layout = LayoutManager::new(template, Sizer, LayoutConfig::default());
        layout.set_rows(vec![10, 20, 30, 40]);
        layout.measure(Size::new(100.0, 100.0));

        // Each block is as tall as its tallest flow slot.
        assert_eq!(layout.container_rect(0).unwrap(), Rect::new(0.0, 0.0, 80.0, 20.0));
        assert_eq!(layout.container_rect(1).unwrap(), Rect::new(0.0, 20.0, 80.0, 60.0));
        assert_eq!(layout.extent_height(), 60.0);

        // Flow slots lay out side by side across the cross axis.
        assert_eq!(
            layout.element_rect(0, 0, Slot::Row(0)).unwrap(),
            Rect::new(0.0, 0.0, 40.0, 20.0)
        );
        assert_eq!(
            layout.element_rect(0, 1, Slot::Row(0)).unwrap(),
            Rect::new(40.0, 0.0, 80.0, 20.0)
        );
        assert_eq!(layout.extent_width(), 80.0);
    }

    #[test]
    fn reload_swaps_one_slot_in_place() {
        let template = GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(50.0)])
            .rows([TrackSizing::Fixed(20.0)])
            .flow_count(NonZeroUsize::new(2).unwrap())
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .build()
            .unwrap();
        let mut layout = layout_with_rows(template, vec![1, 2, 3]);
        layout.measure(Size::new(100.0, 100.0));

        layout.factory_mut().log.clear();
        layout.reload_row(1, 9);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(
            layout.factory().log,
            [Event::Release(Slot::Row(0)), Event::Create(Slot::Row(0))]
        );
        assert_eq!(layout.rows().get(1), Some(&9));
    }

    #[test]
    fn insert_rebuilds_only_from_the_affected_container() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 0..5);

        layout.factory_mut().log.clear();
        layout.insert_row(3, 99);
        // Containers 3 and 4 are released immediately.
        assert_eq!(layout.factory().releases(), 2);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 0..5);
        assert_eq!(layout.factory().creates(), 2);
        assert_eq!(layout.rows().len(), 11);
    }

    #[test]
    fn remove_past_the_realized_range_keeps_everything() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.realized_range(), 0..5);

        layout.factory_mut().log.clear();
        let removed = layout.remove_row(9);
        assert_eq!(removed, 9);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.factory().releases(), 0);
        assert_eq!(layout.factory().creates(), 0);
    }

    #[test]
    fn set_rows_releases_the_old_realization() {
        let mut layout = layout_with_rows(plain_template(20.0), (0..10).collect());
        layout.measure(Size::new(100.0, 100.0));

        layout.factory_mut().log.clear();
        layout.set_rows(vec![1, 2]);
        layout.measure(Size::new(100.0, 100.0));
        assert_eq!(layout.factory().releases(), 5);
        assert_eq!(layout.factory().creates(), 2);
        assert_eq!(layout.realized_range(), 0..2);
    }

    #[test]
    fn grid_lines_repeat_per_container_and_freeze_in_panes() {
        let template = GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Star(1.0)])
            .rows([
                TrackSizing::Fixed(10.0),
                TrackSizing::Fixed(20.0),
                TrackSizing::Fixed(10.0),
            ])
            .frozen_top(1)
            .frozen_bottom(1)
            .row_binding(GridSpan::cell(GridPoint::new(0, 1)))
            .scalar_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .grid_line(
                LineAxis::Horizontal,
                GridPoint::new(0, 0),
                1,
                LinePlacement::Tail,
                PenId(1),
            )
            .grid_line(
                LineAxis::Horizontal,
                GridPoint::new(0, 1),
                1,
                LinePlacement::Tail,
                PenId(2),
            )
            .build()
            .unwrap();
        let mut layout = layout_with_rows(template, vec![0; 9]);
        layout.measure(Size::new(100.0, 100.0));

        let figures = layout.grid_line_figures();
        // The header rule, plus one separator per realized container.
        assert_eq!(figures.len(), 5);
        assert_eq!(figures[0].from.y, 10.0);
        assert_eq!(figures[0].pen, PenId(1));
        let separators: Vec<f64> = figures[1..].iter().map(|f| f.from.y).collect();
        assert_eq!(separators, [30.0, 50.0, 70.0, 90.0]);
        assert_eq!(figures[1].from.x, 0.0);
        assert_eq!(figures[1].to.x, 100.0);

        // Scrolling moves the separators but not the header rule.
        layout.scroll_to(f64::NAN, 10.0);
        layout.measure(Size::new(100.0, 100.0));
        let figures = layout.grid_line_figures();
        assert_eq!(figures[0].from.y, 10.0);
        let separators: Vec<f64> = figures[1..].iter().map(|f| f.from.y).collect();
        assert_eq!(separators, [20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn stretch_track_pins_trailing_tracks_to_the_viewport() {
        let template = GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(30.0), TrackSizing::Fixed(10.0)])
            .rows([TrackSizing::Fixed(20.0)])
            .stretch_column(0)
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .block_binding(BlockSplit::Tail, GridSpan::cell(GridPoint::new(1, 0)))
            .build()
            .unwrap();
        let mut layout = layout_with_rows(template, vec![1, 2]);
        layout.measure(Size::new(100.0, 100.0));

        // 60px of leftover viewport lands after the stretch track.
        assert_eq!(layout.extent_width(), 100.0);
        assert_eq!(
            layout.element_rect(0, 0, Slot::BlockTail(0)).unwrap(),
            Rect::new(90.0, 0.0, 100.0, 20.0)
        );
    }

    #[test]
    fn queries_validate_their_arguments() {
        let template = GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(50.0)])
            .rows([TrackSizing::Fixed(20.0)])
            .flow_count(NonZeroUsize::new(2).unwrap())
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .build()
            .unwrap();
        let mut layout = layout_with_rows(template, vec![1, 2, 3]);
        layout.measure(Size::new(100.0, 100.0));

        assert_eq!(
            layout.element_rect(0, 0, Slot::Row(7)),
            Err(RangeError::UnknownSlot { slot: Slot::Row(7) })
        );
        assert_eq!(
            layout.element_rect(5, 0, Slot::Row(0)),
            Err(RangeError::OrdinalOutOfRange {
                ordinal: 5,
                count: 2
            })
        );
        // The trailing partial block fills one of its two slots.
        assert_eq!(
            layout.element_rect(1, 1, Slot::Row(0)),
            Err(RangeError::FlowSlotOutOfRange {
                flow_slot: 1,
                count: 1
            })
        );
    }

    #[test]
    fn flush_input_writes_back_realized_rows() {
        let mut layout = layout_with_rows(plain_template(20.0), vec![100, 200]);
        layout.measure(Size::new(100.0, 100.0));
        layout.flush_input();
        // The recorder writes each element's serial id into its row.
        assert_ne!(layout.rows().get(0), Some(&100));
        assert_ne!(layout.rows().get(1), Some(&200));
    }
}
