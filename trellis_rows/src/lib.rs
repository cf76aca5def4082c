// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_rows --heading-base-level=0

//! Trellis Rows: the ordered row sequence behind a virtualized grid.
//!
//! This crate is the source of truth for the row side of a Trellis grid:
//!
//! - [`RowManager`]: owns the ordered sequence of host row values, the
//!   current-row pointer, the selection set, and the flow count (rows per
//!   block). It maps row indices onto container ordinals and reports every
//!   mutation as a [`RowsChange`] so the layout engine can keep unaffected
//!   containers alive.
//! - [`SelectMode`] and [`Selection`]: standard multi-select semantics:
//!   `Single` replaces the selection, `Multiple` toggles membership,
//!   `Extended` extends a contiguous range from the previous current row.
//!
//! The row type `R` is entirely the host's: a presenter handle, an index into
//! a database cursor, or plain data. This crate never creates or destroys
//! host rows beyond storing them; materializing rows into visual elements is
//! `trellis_view`'s job.
//!
//! ## Containers and ordinals
//!
//! With a flow count of `n`, consecutive runs of `n` rows form one block
//! container; the container ordinal of row `i` is `i / n`, and the number of
//! containers is `ceil(len / n)` (the final block may be partial). A flow
//! count of one degenerates to one container per row.
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use trellis_rows::RowManager;
//!
//! let mut rows = RowManager::new(NonZeroUsize::new(2).unwrap());
//! for name in ["a", "b", "c"] {
//!     rows.push(name);
//! }
//! assert_eq!(rows.container_count(), 2);
//! assert_eq!(rows.ordinal_of_row(2), 1);
//! assert_eq!(rows.rows_in_container(1), 2..3); // trailing partial block
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod manager;
mod selection;

pub use manager::{RowManager, RowsChange};
pub use selection::{SelectMode, Selection};
