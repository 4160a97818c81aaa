use crate::state::Position;

/// Geometric predicate of a single area.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Axis-aligned rectangle, inclusive edges.
    Rectangle {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
    },
    Ellipse {
        center: (f32, f32),
        radius_x: f32,
        radius_y: f32,
    },
    Triangle {
        a: (f32, f32),
        b: (f32, f32),
        c: (f32, f32),
    },
    /// Parallelogram spanned by `a → b` and `a → d`.
    Parallelogram {
        a: (f32, f32),
        b: (f32, f32),
        d: (f32, f32),
    },
    ZRange {
        min_z: f32,
        max_z: f32,
    },
    /// Accepts positions inside either member.
    Union(Box<AreaBoundary>, Box<AreaBoundary>),
}

/// One predicate of a boundary, optionally inverted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaBoundary {
    pub shape: Shape,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

impl AreaBoundary {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            inverted: false,
        }
    }

    pub fn inverted(shape: Shape) -> Self {
        Self {
            shape,
            inverted: true,
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.shape.contains_area(position) != self.inverted
    }
}

impl Shape {
    fn contains_area(&self, p: &Position) -> bool {
        match self {
            Shape::Rectangle {
                min_x,
                max_x,
                min_y,
                max_y,
            } => p.x >= *min_x && p.x <= *max_x && p.y >= *min_y && p.y <= *max_y,
            Shape::Circle { center, radius } => {
                let dx = p.x - center.0;
                let dy = p.y - center.1;
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                let dx = (p.x - center.0) / radius_x;
                let dy = (p.y - center.1) / radius_y;
                dx * dx + dy * dy <= 1.0
            }
            Shape::Triangle { a, b, c } => {
                let d1 = edge_sign((p.x, p.y), *a, *b);
                let d2 = edge_sign((p.x, p.y), *b, *c);
                let d3 = edge_sign((p.x, p.y), *c, *a);
                let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(has_neg && has_pos)
            }
            Shape::Parallelogram { a, b, d } => {
                let c = (d.0 + b.0 - a.0, d.1 + b.1 - a.1);
                let point = (p.x, p.y);
                let s1 = edge_sign(point, *a, *b);
                let s2 = edge_sign(point, *b, c);
                let s3 = edge_sign(point, c, *d);
                let s4 = edge_sign(point, *d, *a);
                let all_non_neg = s1 >= 0.0 && s2 >= 0.0 && s3 >= 0.0 && s4 >= 0.0;
                let all_non_pos = s1 <= 0.0 && s2 <= 0.0 && s3 <= 0.0 && s4 <= 0.0;
                all_non_neg || all_non_pos
            }
            Shape::ZRange { min_z, max_z } => p.z >= *min_z && p.z <= *max_z,
            Shape::Union(first, second) => first.contains(p) || second.contains(p),
        }
    }
}

/// Cross product sign of `p` relative to the directed edge `a → b`.
fn edge_sign(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Position {
        Position::new(x, y, 0.0)
    }

    #[test]
    fn rectangle_edges_are_inclusive() {
        let rect = AreaBoundary::new(Shape::Rectangle {
            min_x: 0.0,
            max_x: 10.0,
            min_y: -5.0,
            max_y: 5.0,
        });
        assert!(rect.contains(&at(0.0, 5.0)));
        assert!(rect.contains(&at(10.0, -5.0)));
        assert!(!rect.contains(&at(10.1, 0.0)));
    }

    #[test]
    fn inverted_circle_excludes_its_disc() {
        let hole = AreaBoundary::inverted(Shape::Circle {
            center: (0.0, 0.0),
            radius: 3.0,
        });
        assert!(!hole.contains(&at(1.0, 1.0)));
        assert!(hole.contains(&at(4.0, 0.0)));
    }

    #[test]
    fn ellipse_uses_both_radii() {
        let ellipse = AreaBoundary::new(Shape::Ellipse {
            center: (0.0, 0.0),
            radius_x: 10.0,
            radius_y: 2.0,
        });
        assert!(ellipse.contains(&at(9.0, 0.0)));
        assert!(!ellipse.contains(&at(0.0, 3.0)));
    }

    #[test]
    fn triangle_accepts_either_winding() {
        let ccw = AreaBoundary::new(Shape::Triangle {
            a: (0.0, 0.0),
            b: (10.0, 0.0),
            c: (0.0, 10.0),
        });
        let cw = AreaBoundary::new(Shape::Triangle {
            a: (0.0, 0.0),
            b: (0.0, 10.0),
            c: (10.0, 0.0),
        });
        for tri in [&ccw, &cw] {
            assert!(tri.contains(&at(2.0, 2.0)));
            assert!(!tri.contains(&at(8.0, 8.0)));
        }
    }

    #[test]
    fn parallelogram_is_spanned_by_two_edges() {
        let shape = AreaBoundary::new(Shape::Parallelogram {
            a: (0.0, 0.0),
            b: (10.0, 0.0),
            d: (5.0, 5.0),
        });
        assert!(shape.contains(&at(12.0, 4.0)));
        assert!(!shape.contains(&at(1.0, 4.0)));
    }

    #[test]
    fn union_accepts_either_member() {
        let union = AreaBoundary::new(Shape::Union(
            Box::new(AreaBoundary::new(Shape::Circle {
                center: (0.0, 0.0),
                radius: 1.0,
            })),
            Box::new(AreaBoundary::new(Shape::Circle {
                center: (10.0, 0.0),
                radius: 1.0,
            })),
        ));
        assert!(union.contains(&at(0.5, 0.0)));
        assert!(union.contains(&at(10.5, 0.0)));
        assert!(!union.contains(&at(5.0, 0.0)));
    }
}
