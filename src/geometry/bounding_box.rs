//! Axis-aligned bounding box.

use super::Point;
use crate::Coord;

/// An axis-aligned 2D bounding box in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: Coord,
    pub min_y: Coord,
    pub max_x: Coord,
    pub max_y: Coord,
}

impl BoundingBox {
    /// Create an empty (inverted) bounding box, ready to be extended.
    pub fn empty() -> Self {
        Self {
            min_x: Coord::INFINITY,
            min_y: Coord::INFINITY,
            max_x: Coord::NEG_INFINITY,
            max_y: Coord::NEG_INFINITY,
        }
    }

    /// Build a bounding box from a point slice.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut bb = Self::empty();
        for p in points {
            bb.extend(p);
        }
        bb
    }

    /// Grow the box to include the given point.
    pub fn extend(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width of the box (x span).
    #[inline]
    pub fn width(&self) -> Coord {
        self.max_x - self.min_x
    }

    /// Height of the box (y span).
    #[inline]
    pub fn height(&self) -> Coord {
        self.max_y - self.min_y
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether the box contains the point (inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
