//! Closed polygon ring with cached analysis data.
//!
//! A [`Polygon`] is an ordered sequence of vertices with an implicit wrap
//! from the last back to the first. Construction runs the analyzer: every
//! vertex gets its adjacent edges and tangent, and the ring gets its
//! orientation, bounding box, shortest edge and direction histogram. After
//! any mutation the ring must be rebuilt; the planner treats polygons as
//! immutable values.
//!
//! Indexing is circular and 1-based, routed through
//! [`circular_index`](super::circular_index): index 0 is the last vertex,
//! negative indices wrap from the end.

use super::{circular_index, delta_angle, BoundingBox, Edge, Point, Vertex};
use crate::Coord;
use std::collections::BTreeMap;

/// Width of a direction histogram bin in degrees.
pub const DIRECTION_BIN_WIDTH: i32 = 10;

/// Accumulated edge data for one 10°-wide direction bin.
#[derive(Clone, Debug, Default)]
pub struct DirectionBin {
    /// Total edge length accumulated in this bin (meters).
    pub length: Coord,
    /// Edge directions contributing to this bin (degrees).
    pub angles: Vec<Coord>,
}

/// The dominant edge direction of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestDirection {
    /// Center of the winning bin (degrees).
    pub bin: i32,
    /// Floor of the arithmetic mean of the contributing angles (degrees).
    pub dir: i32,
    /// Total edge length of the winning bin (meters).
    pub length: Coord,
}

/// A closed polygon with per-vertex and per-ring analysis data.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    bounding_box: BoundingBox,
    is_clockwise: bool,
    shortest_edge_length: Coord,
    direction_stats: BTreeMap<i32, DirectionBin>,
    best_direction: Option<BestDirection>,
}

impl Polygon {
    /// Build and analyse a polygon from a point ring.
    pub fn new(points: Vec<Point>) -> Self {
        let vertices = points.into_iter().map(Vertex::new).collect();
        let mut polygon = Self {
            vertices,
            bounding_box: BoundingBox::empty(),
            is_clockwise: false,
            shortest_edge_length: 0.0,
            direction_stats: BTreeMap::new(),
            best_direction: None,
        };
        polygon.analyze();
        polygon
    }

    /// Rebuild a polygon from decorated vertices, re-running the analyzer.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        let mut polygon = Self {
            vertices,
            bounding_box: BoundingBox::empty(),
            is_clockwise: false,
            shortest_edge_length: 0.0,
            direction_stats: BTreeMap::new(),
            best_direction: None,
        };
        polygon.analyze();
        polygon
    }

    /// Number of vertices in the ring.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the ring has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Circular 1-based vertex access.
    #[inline]
    pub fn at(&self, index: isize) -> &Vertex {
        &self.vertices[circular_index(self.len(), index) - 1]
    }

    /// The underlying vertex slice (0-based storage order).
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Copy out the raw point ring.
    pub fn points(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| v.point).collect()
    }

    /// Bounding box of the ring.
    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Ring orientation, cached at construction.
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.is_clockwise
    }

    /// Length of the shortest edge (meters).
    #[inline]
    pub fn shortest_edge_length(&self) -> Coord {
        self.shortest_edge_length
    }

    /// Edge length histogram over 10°-wide direction bins.
    #[inline]
    pub fn direction_stats(&self) -> &BTreeMap<i32, DirectionBin> {
        &self.direction_stats
    }

    /// The dominant edge direction, if the ring has edges.
    #[inline]
    pub fn best_direction(&self) -> Option<&BestDirection> {
        self.best_direction.as_ref()
    }

    /// Lazy circular traversal from `from` to `to` (inclusive), stepping by
    /// ±1. When `to == from` the iterator makes a full circle, visiting
    /// every vertex exactly once starting at `from`.
    pub fn iter_range(&self, from: usize, to: usize, step: isize) -> PolygonIterator<'_> {
        debug_assert!(step == 1 || step == -1);
        if self.is_empty() {
            return PolygonIterator {
                polygon: self,
                current: 1,
                from: 1,
                to: 1,
                step,
                emitted: 0,
                done: true,
            };
        }
        let from = circular_index(self.len(), from as isize);
        PolygonIterator {
            polygon: self,
            current: from,
            from,
            to: circular_index(self.len(), to as isize),
            step,
            emitted: 0,
            done: false,
        }
    }

    /// Index of the vertex nearest to `location` (1-based).
    pub fn closest_index(&self, location: &Point) -> usize {
        let mut best = 1;
        let mut best_distance = Coord::INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            let d = v.point.distance_squared(location);
            if d < best_distance {
                best_distance = d;
                best = i + 1;
            }
        }
        best
    }

    /// Return a copy rotated around the origin by `angle` radians.
    pub fn rotated(&self, angle: Coord) -> Polygon {
        Polygon::new(self.vertices.iter().map(|v| v.point.rotated(angle)).collect())
    }

    /// Return a copy translated by the given offsets.
    pub fn translated(&self, dx: Coord, dy: Coord) -> Polygon {
        Polygon::new(
            self.vertices
                .iter()
                .map(|v| v.point.translated(dx, dy))
                .collect(),
        )
    }

    /// Even-odd ray-cast point containment test.
    pub fn contains_point(&self, p: &Point) -> bool {
        let n = self.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = &self.vertices[i].point;
            let b = &self.vertices[j].point;
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Recompute all derived data from the raw points.
    ///
    /// Fills per-vertex `prev_edge`/`next_edge`/`tangent`, then the ring's
    /// bounding box, shortest edge, orientation and direction histogram.
    fn analyze(&mut self) {
        let n = self.vertices.len();
        self.bounding_box = BoundingBox::from_points(self.vertices.iter().map(|v| &v.point));
        if n < 2 {
            return;
        }

        // Edge i runs from vertex i to vertex i+1 (0-based here).
        let edges: Vec<Edge> = (0..n)
            .map(|i| Edge::between(self.vertices[i].point, self.vertices[(i + 1) % n].point))
            .collect();

        for i in 0..n {
            let prev = self.vertices[(i + n - 1) % n].point;
            let next = self.vertices[(i + 1) % n].point;
            self.vertices[i].prev_edge = Some(edges[(i + n - 1) % n]);
            self.vertices[i].next_edge = Some(edges[i]);
            self.vertices[i].tangent = Some(Edge::between(prev, next));
        }

        self.shortest_edge_length = edges
            .iter()
            .map(|e| e.length)
            .fold(Coord::INFINITY, Coord::min);

        // Orientation from the cumulative signed delta between successive
        // edge headings: a counterclockwise ring turns left all the way
        // around (+2π), a clockwise one right (−2π).
        let mut sum = 0.0;
        for i in 0..n {
            sum += delta_angle(edges[(i + 1) % n].angle, edges[i].angle);
        }
        self.is_clockwise = sum < 0.0;

        self.direction_stats = BTreeMap::new();
        for edge in &edges {
            let degrees = edge.angle.to_degrees();
            let bin = (degrees / DIRECTION_BIN_WIDTH as Coord).floor() as i32
                * DIRECTION_BIN_WIDTH
                + DIRECTION_BIN_WIDTH / 2;
            let entry = self.direction_stats.entry(bin).or_default();
            entry.length += edge.length;
            entry.angles.push(degrees);
        }

        self.best_direction = self
            .direction_stats
            .iter()
            .max_by(|a, b| a.1.length.total_cmp(&b.1.length))
            .map(|(bin, stats)| {
                let mean = stats.angles.iter().sum::<Coord>() / stats.angles.len() as Coord;
                BestDirection {
                    bin: *bin,
                    dir: mean.floor() as i32,
                    length: stats.length,
                }
            });
    }
}

/// Lazy circular traversal over a polygon ring. Yields `(index, vertex)`
/// with 1-based indices.
pub struct PolygonIterator<'a> {
    polygon: &'a Polygon,
    current: usize,
    from: usize,
    to: usize,
    step: isize,
    emitted: usize,
    done: bool,
}

impl<'a> Iterator for PolygonIterator<'a> {
    type Item = (usize, &'a Vertex);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.current;
        self.emitted += 1;
        let full_circle = self.from == self.to;
        if (!full_circle && index == self.to)
            || (full_circle && self.emitted == self.polygon.len())
        {
            self.done = true;
        }
        self.current = circular_index(self.polygon.len(), index as isize + self.step);
        Some((index, self.polygon.at(index as isize)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPSILON;

    fn square(side: Coord) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ]
    }

    #[test]
    fn test_orientation() {
        let ccw = Polygon::new(square(100.0));
        assert!(!ccw.is_clockwise());

        let mut points = square(100.0);
        points.reverse();
        let cw = Polygon::new(points);
        assert!(cw.is_clockwise());
    }

    #[test]
    fn test_analysis_edges() {
        let poly = Polygon::new(square(100.0));
        assert!((poly.shortest_edge_length() - 100.0).abs() < EPSILON);
        let v = poly.at(1);
        let next = v.next_edge.as_ref().unwrap();
        assert!((next.length - 100.0).abs() < EPSILON);
        assert!(next.angle.abs() < EPSILON);
        let prev = v.prev_edge.as_ref().unwrap();
        assert!(prev.to.coincides_with(&v.point));
    }

    #[test]
    fn test_direction_stats() {
        let poly = Polygon::new(square(100.0));
        // Two horizontal edges land in bins 5 (0°) and 185 (180°).
        let horizontal = poly.direction_stats().get(&5).unwrap();
        assert!((horizontal.length - 100.0).abs() < EPSILON);
        let best = poly.best_direction().unwrap();
        // All four bins tie at 100m; max_by keeps the last tied bin of the
        // ordered map, but each candidate is a legitimate axis direction.
        assert!((best.length - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_iterator_forward_full_circle() {
        let poly = Polygon::new(square(1.0));
        let indices: Vec<usize> = poly.iter_range(1, 4, 1).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_iterator_wrap_backward() {
        let poly = Polygon::new(square(1.0));
        let indices: Vec<usize> = poly.iter_range(2, 3, -1).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_iterator_full_circle_same_endpoints() {
        let poly = Polygon::new(square(1.0));
        for start in 1..=4 {
            let indices: Vec<usize> = poly.iter_range(start, start, 1).map(|(i, _)| i).collect();
            assert_eq!(indices.len(), 4, "start {start}");
            assert_eq!(indices[0], start);
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_contains_point() {
        let poly = Polygon::new(square(100.0));
        assert!(poly.contains_point(&Point::new(50.0, 50.0)));
        assert!(!poly.contains_point(&Point::new(150.0, 50.0)));
        assert!(!poly.contains_point(&Point::new(-1.0, 50.0)));
    }

    #[test]
    fn test_closest_index() {
        let poly = Polygon::new(square(100.0));
        assert_eq!(poly.closest_index(&Point::new(-5.0, -5.0)), 1);
        assert_eq!(poly.closest_index(&Point::new(104.0, 99.0)), 3);
    }

    #[test]
    fn test_rotated_translated() {
        let poly = Polygon::new(square(10.0));
        let rot = poly.rotated(std::f64::consts::FRAC_PI_2);
        assert!(rot.at(2).point.coincides_with(&Point::new(0.0, 10.0)));
        let moved = poly.translated(5.0, -5.0);
        assert!(moved.at(1).point.coincides_with(&Point::new(5.0, -5.0)));
    }
}
