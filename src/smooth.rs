//! Corner smoothing for generated paths.
//!
//! A Chaikin-style corner-cutting pass: every vertex whose turn angle
//! exceeds the configured threshold is replaced by two points at 1/4 and
//! 3/4 of the adjacent segments. Gentle vertices are kept as-is so long
//! straights are not resampled. Open paths keep their endpoints; closed
//! rings wrap around.

use crate::geometry::{delta_angle, Edge, Point};
use crate::Coord;

/// Smooth a path by iterative corner cutting.
///
/// Only corners sharper than `angle_threshold` (radians) are cut. The
/// headland generator calls this with `closed = true` on offset rings; the
/// linker calls it with `closed = false` on the spiral path after padding
/// both ends.
pub fn smooth(points: &[Point], angle_threshold: Coord, iterations: usize, closed: bool) -> Vec<Point> {
    let mut current = points.to_vec();
    for _ in 0..iterations {
        let next = cut_corners(&current, angle_threshold, closed);
        if next.len() == current.len() {
            break;
        }
        current = next;
    }
    current
}

fn cut_corners(points: &[Point], angle_threshold: Coord, closed: bool) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(n * 2);
    if !closed {
        result.push(points[0]);
    }

    let range = if closed { 0..n } else { 1..n - 1 };
    for i in range {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];

        let in_edge = Edge::between(prev, cur);
        let out_edge = Edge::between(cur, next);
        let turn = delta_angle(out_edge.angle, in_edge.angle).abs();

        if turn > angle_threshold {
            // Cut the corner: 3/4 along the incoming segment, 1/4 along
            // the outgoing one.
            result.push(Point::new(
                prev.x + 0.75 * (cur.x - prev.x),
                prev.y + 0.75 * (cur.y - prev.y),
            ));
            result.push(Point::new(
                cur.x + 0.25 * (next.x - cur.x),
                cur.y + 0.25 * (next.y - cur.y),
            ));
        } else {
            result.push(cur);
        }
    }

    if !closed {
        result.push(points[n - 1]);
    }
    result
}
