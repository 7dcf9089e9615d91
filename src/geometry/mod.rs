//! Geometry kernel for the planner.
//!
//! This module provides the fundamental geometric types and free functions
//! used throughout the planning pipeline:
//! - [`Point`], [`Edge`] and [`Vertex`] - 2D primitives in meters
//! - [`Polygon`] - closed analysed ring of vertices
//! - [`BoundingBox`] - axis-aligned bounding box
//! - polar conversion, angle averaging/differencing with ±π wrap handling
//! - parametric segment intersection
//! - circular polygon indexing and lazy ring traversal
//!
//! ## Conventions
//!
//! Angles are radians in the canonical `(−π, +π]` range; coordinates are
//! meters as 64-bit floats. Every inward/outward decision routes through
//! [`inward`], which maps the ring orientation to a ±π/2 rotation of an
//! edge tangent.

mod bounding_box;
mod point;
mod polygon;

pub use bounding_box::BoundingBox;
pub use point::{Edge, Point, Vertex};
pub use polygon::{BestDirection, DirectionBin, Polygon, PolygonIterator};

use crate::Coord;
use std::f64::consts::PI;

/// Ratio of dy/dx beyond which the polar angle snaps to ±π/2.
const VERTICAL_SLOPE_LIMIT: Coord = 1000.0;

/// Convert Cartesian components to polar form `(angle, length)`.
///
/// Guards the near-vertical case (`x ≈ 0` or |y/x| beyond the slope limit)
/// by returning ±π/2 with the sign of y.
pub fn to_polar(x: Coord, y: Coord) -> (Coord, Coord) {
    let length = x.hypot(y);
    if x.abs() < crate::EPSILON || (y / x).abs() > VERTICAL_SLOPE_LIMIT {
        let angle = if y >= 0.0 { PI / 2.0 } else { -PI / 2.0 };
        return (angle, length);
    }
    (y.atan2(x), length)
}

/// Displace a point by a polar vector.
#[inline]
pub fn add_polar_vector(p: &Point, angle: Coord, length: Coord) -> Point {
    Point::new(p.x + length * angle.cos(), p.y + length * angle.sin())
}

/// Average of two angles, correct across the ±π wrap.
///
/// When the raw difference exceeds π the negative operand is shifted into
/// `[0, 2π)` before averaging; the result is reduced back into `(−π, +π]`.
pub fn average_angle(a: Coord, b: Coord) -> Coord {
    let (a, b) = if (a - b).abs() > PI {
        (wrap_positive(a), wrap_positive(b))
    } else {
        (a, b)
    };
    normalize_angle((a + b) / 2.0)
}

/// Signed difference `a − b`, correct across the ±π wrap.
pub fn delta_angle(a: Coord, b: Coord) -> Coord {
    let (a, b) = if (a - b).abs() > PI {
        (wrap_positive(a), wrap_positive(b))
    } else {
        (a, b)
    };
    a - b
}

/// Shift a negative angle into `[0, 2π)`.
#[inline]
fn wrap_positive(angle: Coord) -> Coord {
    if angle < 0.0 {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Reduce an angle into the canonical `(−π, +π]` range.
pub fn normalize_angle(angle: Coord) -> Coord {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Rotation that turns a boundary-edge tangent toward the field interior:
/// −π/2 on a clockwise ring, +π/2 on a counterclockwise one.
#[inline]
pub fn inward(is_clockwise: bool) -> Coord {
    if is_clockwise {
        -PI / 2.0
    } else {
        PI / 2.0
    }
}

/// Parametric intersection of segments `a1→a2` and `b1→b2`.
///
/// Returns the intersection point iff both parameters lie in `[0, 1]`.
/// Colinear (parallel) segments yield no intersection.
pub fn segment_intersection(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> Option<Point> {
    let d1 = *a2 - *a1;
    let d2 = *b2 - *b1;

    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < crate::EPSILON {
        return None;
    }

    let diff = *b1 - *a1;
    let t = (diff.x * d2.y - diff.y * d2.x) / denom;
    let u = (diff.x * d1.y - diff.y * d1.x) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(a1.x + t * d1.x, a1.y + t * d1.y))
    } else {
        None
    }
}

/// Map any integer index onto the circular range `[1, length]`.
///
/// 0 maps to `length`, negatives wrap from the end, indices beyond
/// `length` wrap from the start. This is the single circular-indexing
/// helper every ring lookup routes through.
pub fn circular_index(length: usize, index: isize) -> usize {
    debug_assert!(length > 0);
    let len = length as isize;
    let m = ((index - 1).rem_euclid(len)) + 1;
    m as usize
}
