// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_layout --heading-base-level=0

//! Trellis Layout: the virtualizing layout and scroll manager.
//!
//! This crate decides, for an arbitrarily large row collection, which
//! containers materialize into visual elements, where every element is
//! positioned and clipped, how scrolling maps onto a coordinate space larger
//! than the viewport, and how frozen and stretched regions interact with
//! scrolling and grid line decoration.
//!
//! The core type is [`LayoutManager`]. It owns:
//!
//! - the immutable [`trellis_grid::GridTemplate`] and the runtime
//!   [`trellis_grid::TrackList`]s resolved from it,
//! - the [`trellis_rows::RowManager`] holding the ordered row sequence,
//! - the host's [`trellis_view::ElementFactory`] and every realized
//!   [`trellis_view::ContainerView`],
//! - the scroll state and the realized ordinal range.
//!
//! ## The measure pass
//!
//! [`LayoutManager::measure`] runs the state machine over viewport validity:
//! any perturbation (rows, scroll, viewport, template) marks the layout
//! dirty, and the next measure (or the next geometry query) recomputes:
//!
//! 1. resolve track lengths for the available size;
//! 2. walk container extents from the scroll offset until the scrollable
//!    band is filled, measuring auto tracks lazily one container at a time;
//! 3. diff against the previously realized range: containers leaving the
//!    range are cleaned up, containers entering it are set up, containers
//!    staying are refreshed in place and never rebuilt;
//! 4. compute extents and clamp scroll offsets.
//!
//! Placement rectangles, [`trellis_grid::Clip`]s, and [`LineFigure`]s are
//! answered from the completed pass. Measuring twice without intervening
//! changes produces identical geometry and no element traffic.
//!
//! ```rust
//! use kurbo::Size;
//! use trellis_grid::{GridPoint, GridSpan, GridTemplate, Orientation, Slot, TrackSizing};
//! use trellis_layout::{LayoutConfig, LayoutManager};
//! use trellis_view::ElementFactory;
//!
//! struct Labels;
//! impl ElementFactory for Labels {
//!     type Row = &'static str;
//!     type Element = &'static str;
//!     fn create(&mut self, _slot: Slot, row: Option<&&'static str>) -> &'static str {
//!         row.copied().unwrap_or("")
//!     }
//!     fn refresh(&mut self, _slot: Slot, _row: Option<&&'static str>, _element: &mut &'static str) {}
//!     fn release(&mut self, _slot: Slot, _element: &'static str) {}
//! }
//!
//! let template = GridTemplate::builder(Orientation::Vertical)
//!     .columns([TrackSizing::Star(1.0)])
//!     .rows([TrackSizing::Fixed(20.0)])
//!     .row_binding(GridSpan::cell(GridPoint::new(0, 0)))
//!     .build()
//!     .unwrap();
//! let mut layout = LayoutManager::new(template, Labels, LayoutConfig::default());
//! layout.set_rows(vec!["a", "b", "c"]);
//! layout.measure(Size::new(100.0, 100.0));
//! assert_eq!(layout.realized_range(), 0..3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod extents;
mod figure;
mod manager;

pub use error::RangeError;
pub use figure::LineFigure;
pub use manager::{Invalidate, LayoutConfig, LayoutManager, Validity};
