//! Self-contained planar geometry for stockyard fences.
//!
//! Containment is boundary-inclusive: a point lying on an edge or vertex of
//! the fence counts as inside. The boundary is tested explicitly before the
//! crossing-number pass so that vertex tie-breaks never decide the result.

use serde::{Deserialize, Serialize};

/// Relative tolerance applied when deciding whether a point sits on an edge.
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Planar coordinate in the stockyard's local reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn magnitude(&self) -> f64 {
        self.x.abs().max(self.y.abs())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Reasons a vertex list cannot be used as a fence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolygonError {
    #[error("invalid polygon: {distinct} distinct vertices, at least 3 required")]
    TooFewVertices { distinct: usize },
    #[error("invalid polygon: vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
}

/// Closed ring of at least three distinct vertices.
///
/// The ring is implicitly closed; a trailing vertex equal to the first one
/// is dropped, and consecutive duplicates are collapsed so that no edge has
/// zero length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: impl IntoIterator<Item = Point>) -> Result<Self, PolygonError> {
        let mut ring: Vec<Point> = Vec::new();
        for (index, vertex) in vertices.into_iter().enumerate() {
            if !vertex.is_finite() {
                return Err(PolygonError::NonFiniteVertex { index });
            }
            if ring.last() != Some(&vertex) {
                ring.push(vertex);
            }
        }

        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        // Repeats further apart than neighbours still count once.
        let distinct = ring
            .iter()
            .enumerate()
            .filter(|&(index, vertex)| !ring[..index].contains(vertex))
            .count();
        if distinct < 3 {
            return Err(PolygonError::TooFewVertices { distinct });
        }

        Ok(Self { vertices: ring })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Edges of the ring, including the closing edge back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Boundary-inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        if !point.is_finite() {
            return false;
        }
        if self.on_boundary(point) {
            return true;
        }
        self.crossing_parity(point)
    }

    pub fn on_boundary(&self, point: Point) -> bool {
        self.edges()
            .any(|(start, end)| point_on_segment(point, start, end))
    }

    // Even-odd rule with a ray cast towards +x. The half-open comparison
    // skips horizontal edges and counts a shared vertex exactly once.
    fn crossing_parity(&self, point: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Validates `vertices` as a ring and tests `point` against it.
pub fn contains(vertices: &[Point], point: Point) -> Result<bool, PolygonError> {
    let polygon = Polygon::new(vertices.iter().copied())?;
    Ok(polygon.contains(point))
}

fn point_on_segment(point: Point, start: Point, end: Point) -> bool {
    let scale = 1.0_f64
        .max(point.magnitude())
        .max(start.magnitude())
        .max(end.magnitude());
    let tolerance = BOUNDARY_TOLERANCE * scale;

    let min_x = start.x.min(end.x) - tolerance;
    let max_x = start.x.max(end.x) + tolerance;
    let min_y = start.y.min(end.y) - tolerance;
    let max_y = start.y.max(end.y) + tolerance;
    if point.x < min_x || point.x > max_x || point.y < min_y || point.y > max_y {
        return false;
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return (point.x - start.x).hypot(point.y - start.y) <= tolerance;
    }

    let cross = dx * (point.y - start.y) - dy * (point.x - start.x);
    (cross / length).abs() <= tolerance
}
