//! Headland track generation (inward polygon offset).
//!
//! The headland is the perimeter band of a field, worked as one or more
//! concentric passes so the vehicle has room to turn while covering the
//! interior. Each pass is produced by offsetting the previous ring inward
//! with an iterative grassfire approximation:
//!
//! 1. Pick a delta no larger than half the shortest edge (large steps on
//!    short edges self-intersect) and no larger than the remaining target.
//! 2. Translate every edge perpendicularly toward the interior.
//! 3. Reconstruct vertices by intersecting consecutive translated edges,
//!    with midpoint/two-endpoint handling where a corner opens a gap.
//! 4. Re-analyse, optionally smooth, and clean the ring with the low-pass
//!    vertex filter.
//! 5. Repeat until the accumulated offset reaches the target.
//!
//! # Failure modes
//!
//! A ring that degenerates below 3 vertices returns the input unchanged;
//! hitting the iteration cap returns the last valid ring and logs the
//! saturation. Both are local recoveries, never errors.

pub mod link;

use crate::geometry::{
    circular_index, delta_angle, inward, segment_intersection, Edge, Point, Polygon,
};
use crate::{Coord, EPSILON};
use log::{debug, warn};
use std::f64::consts::PI;

/// Safety cap on offset iterations per headland pass.
pub const MAX_OFFSET_ITERATIONS: usize = 50;

/// Offset a polygon inward by `target_offset` meters.
///
/// `min_vertex_distance` controls both the gap handling during edge
/// reconstruction and the low-pass cleanup between iterations;
/// `angle_threshold` is the corner threshold handed to the smoother when
/// `do_smooth` is set.
pub fn calculate_headland_track(
    boundary: &Polygon,
    target_offset: Coord,
    min_vertex_distance: Coord,
    angle_threshold: Coord,
    do_smooth: bool,
) -> Polygon {
    if target_offset <= EPSILON {
        return boundary.clone();
    }

    let mut current = boundary.clone();
    let mut offset = 0.0;

    for iteration in 0..MAX_OFFSET_ITERATIONS {
        if target_offset - offset < EPSILON {
            return current;
        }

        let delta = (current.shortest_edge_length() / 2.0).min(target_offset - offset);
        if delta < EPSILON {
            warn!(
                "headland offset stalled at {offset:.2}m of {target_offset:.2}m \
                 (shortest edge collapsed)"
            );
            return current;
        }

        let Some(next) = offset_ring(&current, delta, min_vertex_distance) else {
            warn!("headland ring degenerated at {offset:.2}m of {target_offset:.2}m");
            return boundary.clone();
        };

        let next = if do_smooth {
            Polygon::new(crate::smooth::smooth(&next.points(), angle_threshold, 1, true))
        } else {
            next
        };

        // π as the angle threshold suppresses angle-based removal here;
        // only too-close vertices are merged between iterations.
        let next = apply_low_pass_filter(next, PI, min_vertex_distance);
        if next.len() < 3 {
            warn!("headland ring degenerated at {offset:.2}m of {target_offset:.2}m");
            return boundary.clone();
        }

        current = next;
        offset += delta;
        debug!("offset iteration {iteration}: {offset:.2}m of {target_offset:.2}m");
    }

    warn!("headland offset saturated after {MAX_OFFSET_ITERATIONS} iterations, {offset:.2}m of {target_offset:.2}m reached");
    current
}

/// One grassfire step: translate every edge inward by `delta` and
/// reconstruct the ring from the translated edges.
fn offset_ring(polygon: &Polygon, delta: Coord, min_vertex_distance: Coord) -> Option<Polygon> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }

    let inward_rotation = inward(polygon.is_clockwise());
    let translated: Vec<Edge> = (1..=n as isize)
        .map(|i| {
            let edge = Edge::between(polygon.at(i).point, polygon.at(i + 1).point);
            edge.translated(edge.angle + inward_rotation, delta)
        })
        .collect();

    let mut points: Vec<Point> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &translated[(i + n - 1) % n];
        let cur = &translated[i];
        match segment_intersection(&prev.from, &prev.to, &cur.from, &cur.to) {
            Some(p) => points.push(p),
            None => {
                // A reflex corner pushes the translated edges apart.
                let gap = prev.to.distance(&cur.from);
                if gap < min_vertex_distance {
                    points.push(prev.to.midpoint(&cur.from));
                } else {
                    points.push(prev.to);
                    points.push(cur.from);
                }
            }
        }
    }

    if points.len() < 3 {
        None
    } else {
        Some(Polygon::new(points))
    }
}

/// Remove too-close and too-sharp vertex pairs from a ring.
///
/// Walks the ring once; a failing pair `(cp, np)` is merged into its
/// midpoint and the cursor stays put so the merged vertex is re-examined.
/// Idempotent once a pass makes no change.
pub fn apply_low_pass_filter(
    polygon: Polygon,
    angle_threshold: Coord,
    distance_threshold: Coord,
) -> Polygon {
    let mut polygon = polygon;
    let mut cursor: usize = 1;

    while cursor <= polygon.len() && polygon.len() > 3 {
        let cp = polygon.at(cursor as isize);
        let np = polygon.at(cursor as isize + 1);
        let edge = Edge::between(cp.point, np.point);

        let too_close = edge.length < distance_threshold;
        let too_sharp = match &cp.prev_edge {
            Some(prev) => delta_angle(edge.angle, prev.angle).abs() > angle_threshold,
            None => false,
        };

        if too_close || too_sharp {
            let midpoint = cp.point.midpoint(&np.point);
            let len = polygon.len();
            let cp_index = circular_index(len, cursor as isize) - 1;
            let np_index = circular_index(len, cursor as isize + 1) - 1;
            let mut points = polygon.points();
            points[np_index] = midpoint;
            points.remove(cp_index);
            polygon = Polygon::new(points);
            // Cursor intentionally not advanced.
        } else {
            cursor += 1;
        }
    }

    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPSILON;

    fn square(side: Coord) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ])
    }

    #[test]
    fn test_offset_square() {
        let boundary = square(100.0);
        let inner = calculate_headland_track(&boundary, 10.0, 0.5, PI / 6.0, false);
        assert_eq!(inner.len(), 4);
        let bb = inner.bounding_box();
        assert!((bb.min_x - 10.0).abs() < 0.01, "min_x {}", bb.min_x);
        assert!((bb.max_x - 90.0).abs() < 0.01);
        assert!((bb.min_y - 10.0).abs() < 0.01);
        assert!((bb.max_y - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_offset_preserves_orientation() {
        let boundary = square(100.0);
        let inner = calculate_headland_track(&boundary, 5.0, 0.5, PI / 6.0, false);
        assert_eq!(inner.is_clockwise(), boundary.is_clockwise());

        let mut reversed = boundary.points();
        reversed.reverse();
        let cw = Polygon::new(reversed);
        let inner_cw = calculate_headland_track(&cw, 5.0, 0.5, PI / 6.0, false);
        assert_eq!(inner_cw.is_clockwise(), cw.is_clockwise());
        let bb = inner_cw.bounding_box();
        assert!((bb.min_x - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_offset_stays_inside() {
        let boundary = square(100.0);
        let inner = calculate_headland_track(&boundary, 12.0, 0.5, PI / 6.0, false);
        for v in inner.vertices() {
            assert!(boundary.contains_point(&v.point), "{:?} escaped", v.point);
        }
    }

    #[test]
    fn test_zero_offset_returns_input() {
        let boundary = square(50.0);
        let same = calculate_headland_track(&boundary, 0.0, 0.5, PI / 6.0, false);
        assert_eq!(same.len(), boundary.len());
        assert!(same.at(1).point.coincides_with(&boundary.at(1).point));
    }

    #[test]
    fn test_low_pass_removes_close_vertices() {
        // A square with one duplicated-ish vertex on the bottom edge.
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.001),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        let filtered = apply_low_pass_filter(polygon, PI, 1.0);
        assert_eq!(filtered.len(), 5);
        // No remaining edge shorter than the threshold.
        assert!(filtered.shortest_edge_length() >= 1.0 - EPSILON);
    }

    #[test]
    fn test_low_pass_idempotent() {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.2),
            Point::new(50.5, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        let once = apply_low_pass_filter(polygon, PI, 1.0);
        let twice = apply_low_pass_filter(once.clone(), PI, 1.0);
        assert_eq!(once.len(), twice.len());
        for i in 1..=once.len() as isize {
            assert!(once.at(i).point.coincides_with(&twice.at(i).point));
        }
    }

    #[test]
    fn test_sharp_angle_filtered() {
        // A spike vertex folding back on itself along the bottom edge.
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(50.0, 30.0),
            Point::new(60.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        let filtered = apply_low_pass_filter(polygon, 2.0, 0.1);
        assert!(filtered.len() < 7);
    }
}
