//! Timed boundary markers placed on the map.
use world_core::{Marker, MarkerSink};

/// A marker together with the map time it disappears at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedMarker {
    pub marker: Marker,
    pub expires_at_ms: u64,
}

/// Markers currently shown, aged by the map tick.
#[derive(Debug, Default)]
pub struct MarkerBoard {
    elapsed_ms: u64,
    placed: Vec<PlacedMarker>,
}

impl MarkerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn placed(&self) -> &[PlacedMarker] {
        &self.placed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.placed.iter().map(|placed| &placed.marker)
    }

    /// Removes every marker, expired or not.
    pub fn take(&mut self) -> Vec<Marker> {
        self.placed.drain(..).map(|placed| placed.marker).collect()
    }

    /// Ages the board by `diff` and drops the markers whose time ran out.
    /// Returns how many were dropped.
    pub(super) fn advance(&mut self, diff: u32) -> usize {
        self.elapsed_ms += u64::from(diff);
        let before = self.placed.len();
        let now = self.elapsed_ms;
        self.placed.retain(|placed| placed.expires_at_ms > now);
        before - self.placed.len()
    }
}

impl MarkerSink for MarkerBoard {
    fn spawn_marker(&mut self, marker: Marker) {
        self.placed.push(PlacedMarker {
            marker,
            expires_at_ms: self.elapsed_ms + u64::from(marker.duration_ms),
        });
    }
}
