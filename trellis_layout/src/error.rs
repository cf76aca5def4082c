// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range errors for geometry queries.

use core::fmt;

use trellis_grid::Slot;

/// A geometry query named something outside the current bounds.
///
/// These signal programmer error in the calling collaborator and are returned
/// immediately; layout state is never left inconsistent by them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RangeError {
    /// The container ordinal is outside `[0, container_count)`.
    OrdinalOutOfRange {
        /// The requested ordinal.
        ordinal: usize,
        /// Current number of containers.
        count: usize,
    },
    /// The flow slot is outside the container's filled row slots.
    FlowSlotOutOfRange {
        /// The requested flow slot.
        flow_slot: usize,
        /// Number of filled slots in the container.
        count: usize,
    },
    /// The slot names a binding the template does not declare.
    UnknownSlot {
        /// The requested slot.
        slot: Slot,
    },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrdinalOutOfRange { ordinal, count } => {
                write!(f, "container ordinal {ordinal} outside 0..{count}")
            }
            Self::FlowSlotOutOfRange { flow_slot, count } => {
                write!(f, "flow slot {flow_slot} outside 0..{count}")
            }
            Self::UnknownSlot { slot } => write!(f, "undeclared binding slot {slot:?}"),
        }
    }
}

impl core::error::Error for RangeError {}
