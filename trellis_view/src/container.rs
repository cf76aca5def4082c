// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realized containers: row views, block views, and the tagged variant.

use core::fmt;

use smallvec::SmallVec;
use trellis_grid::{GridTemplate, Slot};

use crate::factory::ElementFactory;

/// One realized row: exactly one element per declared row binding.
///
/// Elements are created in binding declaration order by [`RowView::setup`] and
/// released in reverse order by [`RowView::cleanup`]; between the two, the
/// element count always equals the template's row binding count.
pub struct RowView<F: ElementFactory> {
    row_index: usize,
    elements: SmallVec<[F::Element; 4]>,
}

impl<F: ElementFactory> RowView<F> {
    /// Materializes the row at `row_index` into elements.
    pub fn setup(factory: &mut F, template: &GridTemplate, row: &F::Row, row_index: usize) -> Self {
        let mut elements = SmallVec::new();
        for i in 0..template.row_binding_count() {
            elements.push(factory.create(Slot::Row(i), Some(row)));
        }
        Self {
            row_index,
            elements,
        }
    }

    /// Index of the row this view presents.
    #[must_use]
    pub const fn row_index(&self) -> usize {
        self.row_index
    }

    /// Number of live elements; equals the row binding count after setup.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The element created for the i-th row binding.
    #[must_use]
    pub fn element(&self, binding: usize) -> Option<&F::Element> {
        self.elements.get(binding)
    }

    /// Re-pulls bound values into the existing elements.
    pub fn refresh(&mut self, factory: &mut F, row: &F::Row) {
        for (i, element) in self.elements.iter_mut().enumerate() {
            factory.refresh(Slot::Row(i), Some(row), element);
        }
    }

    /// Pushes edited element state back into the row.
    pub fn flush_input(&self, factory: &mut F, row: &mut F::Row) {
        for (i, element) in self.elements.iter().enumerate() {
            factory.flush_input(Slot::Row(i), row, element);
        }
    }

    /// Releases all elements, in reverse creation order.
    pub fn cleanup(mut self, factory: &mut F) {
        while let Some(element) = self.elements.pop() {
            factory.release(Slot::Row(self.elements.len()), element);
        }
    }
}

impl<F: ElementFactory> fmt::Debug for RowView<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowView")
            .field("row_index", &self.row_index)
            .field("elements", &self.elements.len())
            .finish()
    }
}

/// One realized block: head block elements, up to `flow_count` row views,
/// tail block elements.
///
/// Setup creates, in this fixed order: head block elements, one row view per
/// filled flow slot (fewer than `flow_count` for the trailing partial block),
/// then tail block elements. [`BlockView::cleanup`] reverses that order
/// exactly: tail elements, row slots highest to lowest, head elements.
pub struct BlockView<F: ElementFactory> {
    ordinal: usize,
    head: SmallVec<[F::Element; 2]>,
    rows: SmallVec<[RowView<F>; 2]>,
    tail: SmallVec<[F::Element; 2]>,
}

impl<F: ElementFactory> BlockView<F> {
    /// Materializes the block at `ordinal` over its row slice.
    ///
    /// `rows` holds the rows of this block only; its first element is row
    /// index `ordinal * flow_count`.
    pub fn setup(
        factory: &mut F,
        template: &GridTemplate,
        rows: &[F::Row],
        ordinal: usize,
    ) -> Self {
        let first_row = ordinal * template.flow_count();
        let mut head = SmallVec::new();
        for i in 0..template.block_head_bindings().len() {
            head.push(factory.create(Slot::BlockHead(i), None));
        }
        let mut row_views = SmallVec::new();
        for (j, row) in rows.iter().enumerate() {
            row_views.push(RowView::setup(factory, template, row, first_row + j));
        }
        let mut tail = SmallVec::new();
        for i in 0..template.block_tail_bindings().len() {
            tail.push(factory.create(Slot::BlockTail(i), None));
        }
        Self {
            ordinal,
            head,
            rows: row_views,
            tail,
        }
    }

    /// Ordinal of this block along the main axis.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Number of row slots actually filled; the final block may be partial.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// The i-th filled row view, or `None` outside `0..count()`.
    #[must_use]
    pub fn row(&self, slot: usize) -> Option<&RowView<F>> {
        self.rows.get(slot)
    }

    /// Row index presented by the i-th slot, or `None` outside `0..count()`.
    #[must_use]
    pub fn row_index(&self, slot: usize) -> Option<usize> {
        self.rows.get(slot).map(RowView::row_index)
    }

    /// The element created for the i-th head block binding.
    #[must_use]
    pub fn head_element(&self, binding: usize) -> Option<&F::Element> {
        self.head.get(binding)
    }

    /// The element created for the i-th tail block binding.
    #[must_use]
    pub fn tail_element(&self, binding: usize) -> Option<&F::Element> {
        self.tail.get(binding)
    }

    /// Re-pulls bound values into every existing element of the block.
    pub fn refresh(&mut self, factory: &mut F, rows: &[F::Row]) {
        for (i, element) in self.head.iter_mut().enumerate() {
            factory.refresh(Slot::BlockHead(i), None, element);
        }
        for (view, row) in self.rows.iter_mut().zip(rows) {
            view.refresh(factory, row);
        }
        for (i, element) in self.tail.iter_mut().enumerate() {
            factory.refresh(Slot::BlockTail(i), None, element);
        }
    }

    /// Tears down and rebuilds the one row slot whose row changed identity.
    ///
    /// Sibling slots and block-level elements are untouched; this is what
    /// keeps a current-row reload flicker-free.
    pub fn reload_row(
        &mut self,
        factory: &mut F,
        template: &GridTemplate,
        slot: usize,
        row: &F::Row,
    ) {
        let old = self.rows.remove(slot);
        let row_index = old.row_index();
        old.cleanup(factory);
        self.rows
            .insert(slot, RowView::setup(factory, template, row, row_index));
    }

    /// Fills row slots newly in range and trims slots past the new row count,
    /// leaving already-correct slots untouched.
    ///
    /// Used after an ordinal shift leaves a realized block with missing or
    /// surplus slots.
    pub fn sync_rows(&mut self, factory: &mut F, template: &GridTemplate, rows: &[F::Row]) {
        let first_row = self.ordinal * template.flow_count();
        while self.rows.len() > rows.len() {
            let view = self.rows.pop();
            if let Some(view) = view {
                view.cleanup(factory);
            }
        }
        for j in self.rows.len()..rows.len() {
            self.rows
                .push(RowView::setup(factory, template, &rows[j], first_row + j));
        }
    }

    /// Pushes edited element state back into the block's rows.
    pub fn flush_input(&self, factory: &mut F, rows: &mut [F::Row]) {
        for (view, row) in self.rows.iter().zip(rows) {
            view.flush_input(factory, row);
        }
    }

    /// Releases every element, reversing creation order exactly.
    pub fn cleanup(mut self, factory: &mut F) {
        while let Some(element) = self.tail.pop() {
            factory.release(Slot::BlockTail(self.tail.len()), element);
        }
        while let Some(view) = self.rows.pop() {
            view.cleanup(factory);
        }
        while let Some(element) = self.head.pop() {
            factory.release(Slot::BlockHead(self.head.len()), element);
        }
    }
}

impl<F: ElementFactory> fmt::Debug for BlockView<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockView")
            .field("ordinal", &self.ordinal)
            .field("head", &self.head.len())
            .field("rows", &self.rows.len())
            .field("tail", &self.tail.len())
            .finish()
    }
}

/// A realized container: a plain row when the flow count is one, a block
/// otherwise.
///
/// The two variants share the surface the layout engine drives (`ordinal`,
/// `refresh`, `cleanup`, `flush_input`); kind-specific behavior stays on the
/// variant types.
#[derive(Debug)]
pub enum ContainerView<F: ElementFactory> {
    /// A single-row container.
    Row(RowView<F>),
    /// A multi-row block container.
    Block(BlockView<F>),
}

impl<F: ElementFactory> ContainerView<F> {
    /// Materializes the container at `ordinal` over its row slice.
    ///
    /// `rows` must be non-empty: containers exist only where rows do.
    pub fn setup(
        factory: &mut F,
        template: &GridTemplate,
        rows: &[F::Row],
        ordinal: usize,
    ) -> Self {
        debug_assert!(!rows.is_empty(), "container setup over an empty row slice");
        if template.flow_count() == 1 {
            Self::Row(RowView::setup(factory, template, &rows[0], ordinal))
        } else {
            Self::Block(BlockView::setup(factory, template, rows, ordinal))
        }
    }

    /// Ordinal of this container along the main axis.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        match self {
            Self::Row(view) => view.row_index(),
            Self::Block(view) => view.ordinal(),
        }
    }

    /// Number of rows presented by this container.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::Row(_) => 1,
            Self::Block(view) => view.count(),
        }
    }

    /// The row view for the given flow slot, or `None` outside range.
    #[must_use]
    pub fn row_view(&self, slot: usize) -> Option<&RowView<F>> {
        match self {
            Self::Row(view) => (slot == 0).then_some(view),
            Self::Block(view) => view.row(slot),
        }
    }

    /// Re-pulls bound values into every existing element.
    pub fn refresh(&mut self, factory: &mut F, rows: &[F::Row]) {
        match self {
            Self::Row(view) => view.refresh(factory, &rows[0]),
            Self::Block(view) => view.refresh(factory, rows),
        }
    }

    /// Pushes edited element state back into the container's rows.
    pub fn flush_input(&self, factory: &mut F, rows: &mut [F::Row]) {
        match self {
            Self::Row(view) => view.flush_input(factory, &mut rows[0]),
            Self::Block(view) => view.flush_input(factory, rows),
        }
    }

    /// Releases every element; setup and cleanup are atomic per container.
    pub fn cleanup(self, factory: &mut F) {
        match self {
            Self::Row(view) => view.cleanup(factory),
            Self::Block(view) => view.cleanup(factory),
        }
    }

    /// Visits every live element with its slot and flow slot index.
    ///
    /// Block-level elements report flow slot zero.
    pub fn visit_elements(&self, visit: &mut impl FnMut(Slot, usize, &F::Element)) {
        match self {
            Self::Row(view) => {
                for i in 0..view.element_count() {
                    if let Some(element) = view.element(i) {
                        visit(Slot::Row(i), 0, element);
                    }
                }
            }
            Self::Block(view) => {
                for (i, element) in view.head.iter().enumerate() {
                    visit(Slot::BlockHead(i), 0, element);
                }
                for (j, row_view) in view.rows.iter().enumerate() {
                    for i in 0..row_view.element_count() {
                        if let Some(element) = row_view.element(i) {
                            visit(Slot::Row(i), j, element);
                        }
                    }
                }
                for (i, element) in view.tail.iter().enumerate() {
                    visit(Slot::BlockTail(i), 0, element);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use trellis_grid::{
        BlockSplit, GridPoint, GridSpan, GridTemplate, Orientation, Slot, TrackSizing,
    };

    use super::{BlockView, ContainerView, RowView};
    use crate::factory::ElementFactory;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Create(Slot),
        Release(Slot),
        Refresh(Slot),
        Flush(Slot),
    }

    /// Records lifecycle traffic; elements are serial ids.
    #[derive(Default)]
    struct Recorder {
        log: Vec<Event>,
        next_id: u32,
    }

    impl ElementFactory for Recorder {
        type Row = u32;
        type Element = u32;

        fn create(&mut self, slot: Slot, _row: Option<&u32>) -> u32 {
            self.log.push(Event::Create(slot));
            self.next_id += 1;
            self.next_id
        }

        fn refresh(&mut self, slot: Slot, _row: Option<&u32>, _element: &mut u32) {
            self.log.push(Event::Refresh(slot));
        }

        fn release(&mut self, slot: Slot, _element: u32) {
            self.log.push(Event::Release(slot));
        }

        fn flush_input(&mut self, slot: Slot, _row: &mut u32, _element: &u32) {
            self.log.push(Event::Flush(slot));
        }
    }

    fn row_template() -> GridTemplate {
        GridTemplate::builder(Orientation::Vertical)
            .columns([TrackSizing::Fixed(30.0), TrackSizing::Star(1.0)])
            .rows([TrackSizing::Fixed(20.0)])
            .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
            .row_binding(GridSpan::cell(GridPoint::new(1, 0)))
            .build()
            .unwrap()
    }

    fn block_template() -> GridTemplate {
        GridTemplate::builder(Orientation::Vertical)
            .columns([
                TrackSizing::Fixed(10.0),
                TrackSizing::Star(1.0),
                TrackSizing::Fixed(10.0),
            ])
            .rows([TrackSizing::Fixed(20.0)])
            .flow_count(core::num::NonZeroUsize::new(2).unwrap())
            .row_binding(GridSpan::cell(GridPoint::new(1, 0)))
            .block_binding(BlockSplit::Head, GridSpan::cell(GridPoint::new(0, 0)))
            .block_binding(BlockSplit::Tail, GridSpan::cell(GridPoint::new(2, 0)))
            .build()
            .unwrap()
    }

    #[test]
    fn row_view_owns_one_element_per_binding() {
        let template = row_template();
        let mut factory = Recorder::default();
        let view = RowView::setup(&mut factory, &template, &7, 3);
        assert_eq!(view.element_count(), template.row_binding_count());
        assert_eq!(view.row_index(), 3);
        assert_eq!(
            factory.log,
            [Event::Create(Slot::Row(0)), Event::Create(Slot::Row(1))]
        );

        factory.log.clear();
        view.cleanup(&mut factory);
        assert_eq!(
            factory.log,
            [Event::Release(Slot::Row(1)), Event::Release(Slot::Row(0))]
        );
    }

    #[test]
    fn block_setup_and_cleanup_are_mirror_images() {
        let template = block_template();
        let mut factory = Recorder::default();
        let block = BlockView::setup(&mut factory, &template, &[1, 2], 0);
        assert_eq!(block.count(), 2);
        assert_eq!(
            factory.log,
            [
                Event::Create(Slot::BlockHead(0)),
                Event::Create(Slot::Row(0)),
                Event::Create(Slot::Row(0)),
                Event::Create(Slot::BlockTail(0)),
            ]
        );

        factory.log.clear();
        block.cleanup(&mut factory);
        assert_eq!(
            factory.log,
            [
                Event::Release(Slot::BlockTail(0)),
                Event::Release(Slot::Row(0)),
                Event::Release(Slot::Row(0)),
                Event::Release(Slot::BlockHead(0)),
            ]
        );
    }

    #[test]
    fn trailing_partial_block_fills_fewer_slots() {
        let template = block_template();
        let mut factory = Recorder::default();
        let block = BlockView::setup(&mut factory, &template, &[5], 2);
        assert_eq!(block.count(), 1);
        assert_eq!(block.row_index(0), Some(4));
        assert_eq!(block.row_index(1), None);
        block.cleanup(&mut factory);
    }

    #[test]
    fn reload_rebuilds_only_the_changed_slot() {
        let template = block_template();
        let mut factory = Recorder::default();
        let mut block = BlockView::setup(&mut factory, &template, &[1, 2], 0);
        let kept_id = *block.row(0).unwrap().element(0).unwrap();
        let head_id = *block.head_element(0).unwrap();

        factory.log.clear();
        block.reload_row(&mut factory, &template, 1, &9);
        assert_eq!(
            factory.log,
            [Event::Release(Slot::Row(0)), Event::Create(Slot::Row(0))]
        );

        // Sibling slot and block elements survive untouched.
        assert_eq!(*block.row(0).unwrap().element(0).unwrap(), kept_id);
        assert_eq!(*block.head_element(0).unwrap(), head_id);
        assert_eq!(block.row_index(1), Some(1));
        block.cleanup(&mut factory);
    }

    #[test]
    fn sync_rows_fills_missing_slots_without_disturbing_existing() {
        let template = block_template();
        let mut factory = Recorder::default();
        let mut block = BlockView::setup(&mut factory, &template, &[1], 0);
        let kept_id = *block.row(0).unwrap().element(0).unwrap();

        factory.log.clear();
        block.sync_rows(&mut factory, &template, &[1, 2]);
        assert_eq!(block.count(), 2);
        assert_eq!(*block.row(0).unwrap().element(0).unwrap(), kept_id);
        assert_eq!(factory.log, [Event::Create(Slot::Row(0))]);

        // Shrinking trims from the highest slot down.
        factory.log.clear();
        block.sync_rows(&mut factory, &template, &[1]);
        assert_eq!(block.count(), 1);
        assert_eq!(*block.row(0).unwrap().element(0).unwrap(), kept_id);
        assert_eq!(factory.log, [Event::Release(Slot::Row(0))]);
        block.cleanup(&mut factory);
    }

    #[test]
    fn container_variant_follows_the_flow_count() {
        let mut factory = Recorder::default();
        let row_template = row_template();
        let container = ContainerView::setup(&mut factory, &row_template, &[1], 4);
        assert!(matches!(container, ContainerView::Row(_)));
        assert_eq!(container.ordinal(), 4);
        assert_eq!(container.row_count(), 1);
        container.cleanup(&mut factory);

        let block_template = block_template();
        let container = ContainerView::setup(&mut factory, &block_template, &[1, 2], 3);
        assert!(matches!(container, ContainerView::Block(_)));
        assert_eq!(container.ordinal(), 3);
        assert_eq!(container.row_count(), 2);
        container.cleanup(&mut factory);
    }

    #[test]
    fn flush_input_covers_every_row_element() {
        let template = row_template();
        let mut factory = Recorder::default();
        let mut rows = [7_u32];
        let container = ContainerView::setup(&mut factory, &template, &rows, 0);
        factory.log.clear();
        container.flush_input(&mut factory, &mut rows);
        assert_eq!(
            factory.log,
            [Event::Flush(Slot::Row(0)), Event::Flush(Slot::Row(1))]
        );
        container.cleanup(&mut factory);
    }
}
