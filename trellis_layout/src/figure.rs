// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid line output geometry.

use kurbo::Point;
use trellis_grid::PenId;

/// One straight grid line segment in viewport coordinates.
///
/// Figures are recomputed per measure pass: lines anchored in the scrolling
/// region move with it and repeat per realized container, lines in frozen
/// panes stay put. Hosts resolve the [`PenId`] to an actual stroke.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineFigure {
    /// Segment start, in viewport coordinates.
    pub from: Point,
    /// Segment end, in viewport coordinates.
    pub to: Point,
    /// Styling handle carried from the template's line declaration.
    pub pen: PenId,
}
