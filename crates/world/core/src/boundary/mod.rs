//! Boundary containment: composite area predicates and the diagnostic flood fill.
//!
//! A [`Boundary`] is immutable once built. The [`BoundaryRegistry`] owns every
//! boundary of a map; creature AI contexts only ever hold a
//! [`BoundaryHandle`], a weak view that can be swapped but never keeps the
//! boundary alive on its own.
mod shapes;
mod visualize;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

pub use shapes::{AreaBoundary, Shape};
pub use visualize::{
    FAILSAFE_CELLS, MARKER_ENTRY, MARKER_HEIGHT, MARKER_SCALE, Marker, MarkerSink,
    VisualizeReport, VisualizeStatus, flood_fill,
};

use crate::state::Position;

/// Identifier of a boundary inside a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryId(pub u32);

/// Ordered collection of area predicates combined with AND semantics.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    areas: Vec<AreaBoundary>,
}

impl Boundary {
    pub fn new(areas: Vec<AreaBoundary>) -> Self {
        Self { areas }
    }

    pub fn areas(&self) -> &[AreaBoundary] {
        &self.areas
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// True when every predicate accepts `position`.
    pub fn contains(&self, position: &Position) -> bool {
        self.areas.iter().all(|area| area.contains(position))
    }
}

/// Borrowed view of a registry-owned boundary plus the negate flag.
#[derive(Clone, Debug)]
pub struct BoundaryHandle {
    boundary: Weak<Boundary>,
    negate: bool,
}

impl BoundaryHandle {
    pub fn new(boundary: &Arc<Boundary>, negate: bool) -> Self {
        Self {
            boundary: Arc::downgrade(boundary),
            negate,
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// The boundary, if its owner still holds it.
    pub fn get(&self) -> Option<Arc<Boundary>> {
        self.boundary.upgrade()
    }

    /// Containment test. A released boundary behaves as absent.
    pub fn contains(&self, position: &Position) -> bool {
        match self.boundary.upgrade() {
            Some(boundary) => boundary.contains(position) != self.negate,
            None => true,
        }
    }
}

/// Owns the boundaries of one map for the map's lifetime.
#[derive(Debug, Default)]
pub struct BoundaryRegistry {
    boundaries: HashMap<BoundaryId, Arc<Boundary>>,
}

impl BoundaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `boundary`, replacing any previous one under the same id.
    ///
    /// Handles to the replaced boundary go dead and read as "no boundary"
    /// until their owners fetch a new handle.
    pub fn insert(&mut self, id: BoundaryId, boundary: Boundary) -> Option<Arc<Boundary>> {
        self.boundaries.insert(id, Arc::new(boundary))
    }

    pub fn remove(&mut self, id: BoundaryId) -> Option<Arc<Boundary>> {
        self.boundaries.remove(&id)
    }

    pub fn handle(&self, id: BoundaryId, negate: bool) -> Option<BoundaryHandle> {
        self.boundaries
            .get(&id)
            .map(|boundary| BoundaryHandle::new(boundary, negate))
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Boundary {
        Boundary::new(vec![
            AreaBoundary::new(Shape::Circle {
                center: (0.0, 0.0),
                radius: 20.0,
            }),
            AreaBoundary::new(Shape::ZRange {
                min_z: -5.0,
                max_z: 5.0,
            }),
        ])
    }

    #[test]
    fn all_predicates_must_accept() {
        let boundary = arena();
        assert!(boundary.contains(&Position::new(3.0, 4.0, 0.0)));
        assert!(!boundary.contains(&Position::new(3.0, 4.0, 10.0)));
        assert!(!boundary.contains(&Position::new(30.0, 0.0, 0.0)));
    }

    #[test]
    fn negated_handle_flips_containment() {
        let boundary = Arc::new(arena());
        let inside = Position::new(1.0, 1.0, 0.0);
        assert!(BoundaryHandle::new(&boundary, false).contains(&inside));
        assert!(!BoundaryHandle::new(&boundary, true).contains(&inside));
    }

    #[test]
    fn released_boundary_reads_as_everywhere() {
        let mut registry = BoundaryRegistry::new();
        registry.insert(BoundaryId(1), arena());
        let handle = registry.handle(BoundaryId(1), false).unwrap();
        let far = Position::new(500.0, 500.0, 0.0);
        assert!(!handle.contains(&far));

        registry.remove(BoundaryId(1));
        assert!(handle.get().is_none());
        assert!(handle.contains(&far));
    }

    #[test]
    fn replacing_a_boundary_detaches_old_handles() {
        let mut registry = BoundaryRegistry::new();
        registry.insert(BoundaryId(7), arena());
        let old = registry.handle(BoundaryId(7), false).unwrap();
        let previous = registry.insert(BoundaryId(7), Boundary::default());
        assert!(previous.is_some());
        drop(previous);
        assert!(old.get().is_none());
        assert!(registry.handle(BoundaryId(7), false).unwrap().get().is_some());
    }
}
