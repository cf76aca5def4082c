// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis track sequences and their resolution to absolute offsets.

use alloc::vec::Vec;

/// Sizing mode for a single track.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrackSizing {
    /// The track always resolves to this length.
    Fixed(f64),
    /// The track resolves to the maximum measured content length of the
    /// elements mapped onto it. Only realized rows are ever measured, so the
    /// maximum is taken over realized content.
    Auto,
    /// The track takes a proportional share of the space left after fixed and
    /// auto tracks, weighted by this factor. Shares never go negative.
    Star(f64),
}

/// One column or row slot in the grid coordinate system.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    sizing: TrackSizing,
    measured: f64,
    resolved: f64,
}

impl Track {
    fn new(sizing: TrackSizing) -> Self {
        // Clamp finite negative declarations to `0.0`, as measured extents are.
        let sizing = match sizing {
            TrackSizing::Fixed(len) if len.is_sign_negative() => TrackSizing::Fixed(0.0),
            TrackSizing::Star(weight) if weight.is_sign_negative() => TrackSizing::Star(0.0),
            other => other,
        };
        Self {
            sizing,
            measured: 0.0,
            resolved: 0.0,
        }
    }

    /// The declared sizing mode.
    #[must_use]
    pub const fn sizing(&self) -> TrackSizing {
        self.sizing
    }

    /// The length this track resolved to in the last [`TrackList::resolve`].
    #[must_use]
    pub const fn resolved(&self) -> f64 {
        self.resolved
    }
}

/// The ordered track sequence for one axis, with frozen-edge counts and an
/// optional stretch designation.
///
/// A `TrackList` is the mutable, runtime counterpart of one axis of a
/// `GridTemplate`: the layout engine feeds content measurements into auto
/// tracks and calls [`TrackList::resolve`] once per measure pass, then reads
/// offsets back out. Offsets are only meaningful after a resolve.
#[derive(Clone, Debug)]
pub struct TrackList {
    tracks: Vec<Track>,
    /// Prefix starts; `offsets[i]` is the head edge of track `i`.
    offsets: Vec<f64>,
    total: f64,
    frozen_head: usize,
    frozen_tail: usize,
    stretch: Option<usize>,
}

impl TrackList {
    /// Creates a track list from declared sizings.
    ///
    /// `frozen_head`/`frozen_tail` count leading/trailing tracks that do not
    /// scroll; `stretch` designates the track that absorbs leftover viewport
    /// space. Callers are expected to have validated the counts against the
    /// track count (the template builder does this).
    #[must_use]
    pub fn new(
        sizings: impl IntoIterator<Item = TrackSizing>,
        frozen_head: usize,
        frozen_tail: usize,
        stretch: Option<usize>,
    ) -> Self {
        let tracks: Vec<Track> = sizings.into_iter().map(Track::new).collect();
        let len = tracks.len();
        debug_assert!(
            frozen_head + frozen_tail <= len,
            "frozen counts exceed track count: {frozen_head}+{frozen_tail} > {len}"
        );
        let mut offsets = Vec::new();
        offsets.resize(len, 0.0);
        Self {
            tracks,
            offsets,
            total: 0.0,
            frozen_head,
            frozen_tail,
            stretch,
        }
    }

    /// Number of tracks on this axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` if there are no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of leading frozen tracks.
    #[must_use]
    pub const fn frozen_head(&self) -> usize {
        self.frozen_head
    }

    /// Number of trailing frozen tracks.
    #[must_use]
    pub const fn frozen_tail(&self) -> usize {
        self.frozen_tail
    }

    /// The stretch track index, if one is designated.
    #[must_use]
    pub const fn stretch(&self) -> Option<usize> {
        self.stretch
    }

    /// Returns the track at `index`.
    #[must_use]
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    /// Feeds a content measurement into an auto track.
    ///
    /// Measurements accumulate as a running maximum; fixed and star tracks
    /// ignore them. Finite negative extents are clamped to `0.0`.
    pub fn set_measured(&mut self, index: usize, extent: f64) {
        debug_assert!(
            extent.is_finite(),
            "track measurements must be finite; got {extent:?}"
        );
        let extent = if extent.is_sign_negative() { 0.0 } else { extent };
        let track = &mut self.tracks[index];
        if extent > track.measured {
            track.measured = extent;
        }
    }

    /// Discards all accumulated measurements.
    ///
    /// Used when the realized content changes wholesale (template edit, row
    /// reload) and the old maxima no longer describe any live element.
    pub fn reset_measured(&mut self) {
        for track in &mut self.tracks {
            track.measured = 0.0;
        }
    }

    /// Resolves every track against `available` space and rebuilds offsets.
    ///
    /// Fixed tracks resolve to their declared length, auto tracks to their
    /// measured maximum, and star tracks split the non-negative remainder
    /// proportionally to their weights. Returns the total resolved length.
    pub fn resolve(&mut self, available: f64) -> f64 {
        let available = available.max(0.0);

        let mut consumed = 0.0;
        let mut star_weight = 0.0;
        for track in &self.tracks {
            match track.sizing {
                TrackSizing::Fixed(len) => consumed += len,
                TrackSizing::Auto => consumed += track.measured,
                TrackSizing::Star(weight) => star_weight += weight,
            }
        }
        let leftover = (available - consumed).max(0.0);

        let mut pos = 0.0;
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.resolved = match track.sizing {
                TrackSizing::Fixed(len) => len,
                TrackSizing::Auto => track.measured,
                TrackSizing::Star(weight) => {
                    if star_weight > 0.0 {
                        leftover * weight / star_weight
                    } else {
                        0.0
                    }
                }
            };
            self.offsets[i] = pos;
            pos += track.resolved;
        }
        self.total = pos;
        pos
    }

    /// Head edge of track `index`, with `index == len()` meaning the tail
    /// edge of the last track.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> f64 {
        if index >= self.tracks.len() {
            self.total
        } else {
            self.offsets[index]
        }
    }

    /// Resolved length of track `index`.
    #[must_use]
    pub fn len_of(&self, index: usize) -> f64 {
        self.tracks[index].resolved
    }

    /// Total resolved length of all tracks.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Total resolved length of the leading frozen tracks.
    #[must_use]
    pub fn frozen_head_extent(&self) -> f64 {
        self.offset_of(self.frozen_head)
    }

    /// Total resolved length of the trailing frozen tracks.
    #[must_use]
    pub fn frozen_tail_extent(&self) -> f64 {
        self.total - self.offset_of(self.tracks.len() - self.frozen_tail)
    }
}

#[cfg(test)]
mod tests {
    use super::{TrackList, TrackSizing};

    fn list(sizings: &[TrackSizing]) -> TrackList {
        TrackList::new(sizings.iter().copied(), 0, 0, None)
    }

    #[test]
    fn fixed_tracks_resolve_unconditionally() {
        let mut tracks = list(&[TrackSizing::Fixed(10.0), TrackSizing::Fixed(20.0)]);
        assert_eq!(tracks.resolve(5.0), 30.0);
        assert_eq!(tracks.offset_of(0), 0.0);
        assert_eq!(tracks.offset_of(1), 10.0);
        assert_eq!(tracks.offset_of(2), 30.0);
    }

    #[test]
    fn auto_tracks_take_the_measured_maximum() {
        let mut tracks = list(&[TrackSizing::Auto, TrackSizing::Fixed(10.0)]);
        tracks.set_measured(0, 15.0);
        tracks.set_measured(0, 25.0);
        tracks.set_measured(0, 5.0);
        assert_eq!(tracks.resolve(100.0), 35.0);
        assert_eq!(tracks.len_of(0), 25.0);

        tracks.reset_measured();
        assert_eq!(tracks.resolve(100.0), 10.0);
    }

    #[test]
    fn star_tracks_split_the_leftover_by_weight() {
        let mut tracks = list(&[
            TrackSizing::Fixed(40.0),
            TrackSizing::Star(1.0),
            TrackSizing::Star(3.0),
        ]);
        tracks.resolve(100.0);
        assert_eq!(tracks.len_of(1), 15.0);
        assert_eq!(tracks.len_of(2), 45.0);
        assert_eq!(tracks.total(), 100.0);
    }

    #[test]
    fn star_tracks_never_go_negative() {
        let mut tracks = list(&[TrackSizing::Fixed(50.0), TrackSizing::Star(1.0)]);
        tracks.resolve(30.0);
        assert_eq!(tracks.len_of(1), 0.0);
        assert_eq!(tracks.total(), 50.0);
    }

    #[test]
    fn frozen_extents_cover_the_edge_tracks() {
        let mut tracks = TrackList::new(
            [
                TrackSizing::Fixed(10.0),
                TrackSizing::Fixed(20.0),
                TrackSizing::Fixed(5.0),
            ],
            1,
            1,
            None,
        );
        tracks.resolve(0.0);
        assert_eq!(tracks.frozen_head_extent(), 10.0);
        assert_eq!(tracks.frozen_tail_extent(), 5.0);
    }

    #[test]
    fn stretch_designation_is_carried_per_axis() {
        let tracks = TrackList::new(
            [TrackSizing::Fixed(10.0), TrackSizing::Fixed(20.0)],
            0,
            1,
            Some(0),
        );
        assert_eq!(tracks.stretch(), Some(0));
        assert_eq!(list(&[TrackSizing::Auto]).stretch(), None);
    }

    #[test]
    fn negative_declarations_are_clamped() {
        let mut tracks = list(&[TrackSizing::Fixed(-5.0), TrackSizing::Star(-1.0)]);
        assert_eq!(tracks.resolve(10.0), 0.0);
    }
}
