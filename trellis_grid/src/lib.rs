// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_grid --heading-base-level=0

//! Trellis Grid: track model, grid template, and geometry vocabulary.
//!
//! This crate holds the declarative half of the Trellis virtualizing grid:
//! everything that is fixed once a screen definition is composed and that the
//! layout engine in `trellis_layout` consumes read-only.
//!
//! The core concepts are:
//!
//! - [`GridPoint`] and [`GridSpan`]: coordinates into the track grid, used to
//!   anchor bindings and grid lines.
//! - [`Clip`]: a four-sided inset describing how much of an element is hidden
//!   behind a frozen pane or viewport edge, with [`f64::INFINITY`] meaning
//!   "fully clipped on that side".
//! - [`TrackSizing`] and [`TrackList`]: per-axis track sequences with fixed,
//!   content-measured (auto), and proportional (star) sizing, resolved to
//!   absolute offsets for a given available length.
//! - [`GridTemplate`] and [`TemplateBuilder`]: the immutable screen
//!   definition: track sizings for both axes, binding slots with their
//!   spans, frozen-edge counts, the flow count (rows per block), stretch
//!   designations, and decorative grid line declarations.
//!
//! A template is built once per screen definition and validated as a whole:
//!
//! ```rust
//! use trellis_grid::{GridPoint, GridSpan, GridTemplate, Orientation, TrackSizing};
//!
//! // One 10px frozen header track, then a 20px track repeated per row.
//! let template = GridTemplate::builder(Orientation::Vertical)
//!     .columns([TrackSizing::Star(1.0)])
//!     .rows([TrackSizing::Fixed(10.0), TrackSizing::Fixed(20.0)])
//!     .frozen_top(1)
//!     .scalar_binding(GridSpan::cell(GridPoint::new(0, 0)))
//!     .row_binding(GridSpan::cell(GridPoint::new(0, 1)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(template.row_binding_count(), 1);
//! ```
//!
//! Malformed definitions (a span outside the declared tracks, two stretch
//! tracks on one axis, a block binding inside the row flow) fail at
//! [`TemplateBuilder::build`] with a [`TemplateError`]; nothing is validated
//! lazily during layout.
//!
//! This crate deliberately does **not** perform layout, own visual elements,
//! or know about row data. See `trellis_rows`, `trellis_view`, and
//! `trellis_layout` for those.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod template;
mod track;

pub use error::{Axis, TemplateError};
pub use geometry::{Clip, GridPoint, GridSpan, PenId};
pub use template::{
    BindingDef, BlockSplit, GridLineDef, GridTemplate, LineAxis, LinePlacement, Orientation, Slot,
    TemplateBuilder,
};
pub use track::{Track, TrackList, TrackSizing};
