//! Diagnostic flood fill that makes a boundary visible with timed markers.

use std::collections::VecDeque;

use crate::state::Position;

/// Creature entry spawned as a boundary marker.
pub const MARKER_ENTRY: u32 = 15425;
pub const MARKER_SCALE: f32 = 0.25;
/// Markers float above the seed height so they stay visible on slopes.
pub const MARKER_HEIGHT: f32 = 5.0;
/// Traversal cap in grid cells along each axis.
pub const FAILSAFE_CELLS: i32 = 750;

const GRID_STEP: f32 = 1.0;
const GRID_SIDE: usize = (2 * FAILSAFE_CELLS + 1) as usize;
const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Outcome of a boundary visualization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum VisualizeStatus {
    Success,
    /// The fill reached the traversal cap; the boundary may be open.
    PossiblyUnbounded,
    /// No boundary is configured.
    NotBounded,
    /// None of the seed candidates lies inside the boundary.
    NoInteriorPointFound,
}

impl VisualizeStatus {
    pub const fn code(self) -> i32 {
        match self {
            VisualizeStatus::Success => 0,
            VisualizeStatus::PossiblyUnbounded => 1,
            VisualizeStatus::NotBounded => 2,
            VisualizeStatus::NoInteriorPointFound => 3,
        }
    }
}

/// A timed, harmless, non-colliding visual marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub entry: u32,
    pub position: Position,
    pub duration_ms: u32,
    pub scale: f32,
    pub selectable: bool,
}

/// Receives the markers produced by a flood fill.
pub trait MarkerSink {
    fn spawn_marker(&mut self, marker: Marker);
}

impl MarkerSink for Vec<Marker> {
    fn spawn_marker(&mut self, marker: Marker) {
        self.push(marker);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualizeReport {
    pub status: VisualizeStatus,
    pub seed: Option<Position>,
    pub visited_cells: usize,
    pub markers: usize,
}

impl VisualizeReport {
    pub(crate) fn failed(status: VisualizeStatus) -> Self {
        Self {
            status,
            seed: None,
            visited_cells: 0,
            markers: 0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Unchecked,
    Inside,
    Outside,
}

/// Dense classification grid covering `±FAILSAFE_CELLS` on both axes.
struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    fn new() -> Self {
        Self {
            cells: vec![Cell::Unchecked; GRID_SIDE * GRID_SIDE],
        }
    }

    fn index(x: i32, y: i32) -> usize {
        (x + FAILSAFE_CELLS) as usize * GRID_SIDE + (y + FAILSAFE_CELLS) as usize
    }

    fn get(&self, x: i32, y: i32) -> Cell {
        self.cells[Self::index(x, y)]
    }

    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        self.cells[Self::index(x, y)] = cell;
    }
}

/// Breadth-first 4-connected fill from `seed` over a unit grid.
///
/// `seed` must satisfy `contains`. Outside cells are classified but never
/// expanded. Each inside cell bordering an outside cell gets a selectable
/// marker; with `fill_interior` every other inside cell gets a
/// non-selectable one. Visited cells never exceed `(2·750+1)²`.
pub fn flood_fill(
    seed: Position,
    contains: impl Fn(&Position) -> bool,
    duration_secs: u32,
    fill_interior: bool,
    sink: &mut dyn MarkerSink,
) -> VisualizeReport {
    let mut grid = Grid::new();
    let mut queue = VecDeque::new();
    let mut hit_limit = false;
    let mut visited = 1usize;
    let mut markers = 0usize;

    grid.set(0, 0, Cell::Inside);
    queue.push_back((0i32, 0i32));

    let cell_position = |x: i32, y: i32| Position {
        x: seed.x + x as f32 * GRID_STEP,
        y: seed.y + y as f32 * GRID_STEP,
        z: seed.z,
        orientation: 0.0,
    };

    while let Some((x, y)) = queue.pop_front() {
        let mut borders_outside = false;
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (x + dx, y + dy);
            if nx.abs() > FAILSAFE_CELLS || ny.abs() > FAILSAFE_CELLS {
                hit_limit = true;
                continue;
            }
            match grid.get(nx, ny) {
                Cell::Unchecked => {
                    visited += 1;
                    if contains(&cell_position(nx, ny)) {
                        grid.set(nx, ny, Cell::Inside);
                        queue.push_back((nx, ny));
                    } else {
                        grid.set(nx, ny, Cell::Outside);
                        borders_outside = true;
                    }
                }
                Cell::Outside => borders_outside = true,
                Cell::Inside => {}
            }
        }

        if fill_interior || borders_outside {
            let mut position = cell_position(x, y);
            position.z += MARKER_HEIGHT;
            sink.spawn_marker(Marker {
                entry: MARKER_ENTRY,
                position,
                duration_ms: duration_secs.saturating_mul(1000),
                scale: MARKER_SCALE,
                selectable: borders_outside,
            });
            markers += 1;
        }
    }

    let status = if hit_limit {
        VisualizeStatus::PossiblyUnbounded
    } else {
        VisualizeStatus::Success
    };
    tracing::trace!(%status, visited, markers, "boundary flood fill finished");

    VisualizeReport {
        status,
        seed: Some(seed),
        visited_cells: visited,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(radius: f32) -> impl Fn(&Position) -> bool {
        move |p: &Position| p.x * p.x + p.y * p.y <= radius * radius
    }

    #[test]
    fn closed_boundary_outlines_only_its_edge() {
        let mut markers = Vec::new();
        let report = flood_fill(Position::new(0.0, 0.0, 0.0), disc(10.0), 30, false, &mut markers);

        assert_eq!(report.status, VisualizeStatus::Success);
        assert_eq!(report.markers, markers.len());
        assert!(!markers.is_empty());
        for marker in &markers {
            assert!(marker.selectable);
            assert_eq!(marker.entry, MARKER_ENTRY);
            assert_eq!(marker.duration_ms, 30_000);
            assert_eq!(marker.position.z, MARKER_HEIGHT);
            let r = (marker.position.x.powi(2) + marker.position.y.powi(2)).sqrt();
            assert!(r > 8.0 && r <= 10.0, "edge marker at radius {r}");
        }
    }

    #[test]
    fn interior_fill_adds_unselectable_markers() {
        let mut outline = Vec::new();
        flood_fill(Position::default(), disc(6.0), 5, false, &mut outline);
        let mut filled = Vec::new();
        let report = flood_fill(Position::default(), disc(6.0), 5, true, &mut filled);

        assert!(filled.len() > outline.len());
        let selectable = filled.iter().filter(|m| m.selectable).count();
        assert_eq!(selectable, outline.len());
        // Every inside cell carries exactly one marker.
        let mut inside = 0;
        for x in -6i32..=6 {
            for y in -6i32..=6 {
                if x * x + y * y <= 36 {
                    inside += 1;
                }
            }
        }
        assert_eq!(filled.len(), inside);
        assert!(report.visited_cells > inside);
    }

    #[test]
    fn open_boundary_hits_the_failsafe() {
        let strip = |p: &Position| p.y.abs() <= 2.0;
        let mut markers = Vec::new();
        let report = flood_fill(Position::default(), strip, 1, false, &mut markers);

        assert_eq!(report.status, VisualizeStatus::PossiblyUnbounded);
        assert!(report.visited_cells <= GRID_SIDE * GRID_SIDE);
        assert!(markers.iter().all(|m| m.position.x.abs() <= FAILSAFE_CELLS as f32));
    }

    #[test]
    fn seed_offsets_every_marker() {
        let seed = Position::new(100.0, -50.0, 12.0);
        let around_seed = move |p: &Position| {
            let dx = p.x - 100.0;
            let dy = p.y + 50.0;
            dx * dx + dy * dy <= 9.0
        };
        let mut markers = Vec::new();
        flood_fill(seed, around_seed, 1, true, &mut markers);
        assert!(markers.iter().all(|m| m.position.z == 12.0 + MARKER_HEIGHT));
        assert!(markers.iter().any(|m| m.position.x == 100.0 && m.position.y == -50.0));
    }
}
