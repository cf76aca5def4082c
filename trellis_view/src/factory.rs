// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-implemented binding execution seam.

use kurbo::Size;
use trellis_grid::Slot;

/// Creates, refreshes, and releases the host's visual elements.
///
/// Trellis drives element lifecycles but never owns element semantics: a
/// factory is handed the [`Slot`] being materialized and, for row bindings,
/// the host row the element binds to. Block and scalar slots receive no row.
///
/// Implementations must be cheap to call repeatedly: `refresh` runs for every
/// kept element on every measure pass that follows an invalidation.
pub trait ElementFactory {
    /// The host's row value (a presenter handle, record, or plain data).
    type Row;
    /// The host's visual element.
    type Element;

    /// Creates the element for `slot`, bound to `row` for row bindings.
    fn create(&mut self, slot: Slot, row: Option<&Self::Row>) -> Self::Element;

    /// Re-pulls bound values into an already-created element.
    fn refresh(&mut self, slot: Slot, row: Option<&Self::Row>, element: &mut Self::Element);

    /// Releases an element for recycling. Called in reverse creation order.
    fn release(&mut self, slot: Slot, element: Self::Element);

    /// Pushes edited element state back into the row (row bindings only).
    fn flush_input(&mut self, slot: Slot, row: &mut Self::Row, element: &Self::Element) {
        let _ = (slot, row, element);
    }

    /// Measures an element's desired size, feeding auto-sized tracks.
    ///
    /// The default reports zero, which leaves auto tracks at their measured
    /// maximum so far. Hosts with content-sized tracks override this.
    fn measure(&mut self, slot: Slot, element: &Self::Element) -> Size {
        let _ = (slot, element);
        Size::ZERO
    }
}
