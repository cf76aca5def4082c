// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Template definition errors.

use core::fmt;

use crate::template::Slot;

/// Which track axis an error refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    /// The column-track axis.
    Column,
    /// The row-track axis.
    Row,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column => f.write_str("column"),
            Self::Row => f.write_str("row"),
        }
    }
}

/// A malformed template definition.
///
/// These are fatal at [`TemplateBuilder::build`](crate::TemplateBuilder::build)
/// time; a successfully built template never produces them during layout.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateError {
    /// A binding's span lies outside the declared track counts.
    SpanOutOfBounds {
        /// The offending binding slot.
        slot: Slot,
    },
    /// A grid line's anchor or run lies outside the declared track counts.
    LineOutOfBounds {
        /// Index of the offending line declaration.
        index: usize,
    },
    /// Frozen-edge counts exceed or overlap within the axis' track count.
    FrozenOutOfBounds {
        /// The offending axis.
        axis: Axis,
    },
    /// A stretch designation names a track outside the axis.
    StretchOutOfBounds {
        /// The offending axis.
        axis: Axis,
    },
    /// More than one track on the axis was designated as the stretch track.
    MultipleStretch {
        /// The offending axis.
        axis: Axis,
    },
    /// The template declares no row bindings, so there is no row region to
    /// repeat per row.
    NoRowBindings,
    /// A scalar binding's span intersects the repeating row region on the
    /// main axis.
    ScalarInRowRegion {
        /// Index of the offending scalar binding.
        index: usize,
    },
    /// A block binding's span conflicts with its declared head/tail split
    /// relative to the row flow.
    BlockSplitConflict {
        /// Index of the offending block binding, in declaration order.
        index: usize,
    },
    /// The row region overlaps frozen tracks on the main axis.
    RowRegionInFrozen,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpanOutOfBounds { slot } => {
                write!(f, "binding {slot:?} spans outside the declared tracks")
            }
            Self::LineOutOfBounds { index } => {
                write!(f, "grid line {index} lies outside the declared tracks")
            }
            Self::FrozenOutOfBounds { axis } => {
                write!(f, "frozen counts exceed the {axis} track count")
            }
            Self::StretchOutOfBounds { axis } => {
                write!(f, "stretch designation outside the {axis} tracks")
            }
            Self::MultipleStretch { axis } => {
                write!(f, "more than one stretch track on the {axis} axis")
            }
            Self::NoRowBindings => f.write_str("template declares no row bindings"),
            Self::ScalarInRowRegion { index } => {
                write!(f, "scalar binding {index} intersects the row region")
            }
            Self::BlockSplitConflict { index } => {
                write!(
                    f,
                    "block binding {index} lies on the wrong side of the row flow"
                )
            }
            Self::RowRegionInFrozen => f.write_str("row region overlaps frozen tracks"),
        }
    }
}

impl core::error::Error for TemplateError {}
