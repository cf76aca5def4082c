// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_view --heading-base-level=0

//! Trellis View: container views and the binding-execution seam.
//!
//! The layout engine in `trellis_layout` decides *which* containers exist;
//! this crate owns *what* a container is:
//!
//! - [`ElementFactory`]: the host-implemented seam through which elements are
//!   created, refreshed, measured, released, and have edited input flushed
//!   back into rows. Trellis never constructs host elements itself.
//! - [`RowView`]: one realized row: exactly one element per declared row
//!   binding, in declaration order.
//! - [`BlockView`]: one realized block: head block elements, up to
//!   `flow_count` row views (fewer for the trailing partial block), then tail
//!   block elements. Teardown reverses creation order exactly.
//! - [`ContainerView`]: the tagged row/block variant the layout engine
//!   stores per realized ordinal.
//!
//! Setup and cleanup are atomic per container: a container is never
//! partially live. Refreshing re-pulls values into existing elements without
//! recreating them, which is what makes recycling observable-free for
//! containers that stay in the realized range.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod container;
mod factory;

pub use container::{BlockView, ContainerView, RowView};
pub use factory::ElementFactory;
