//! Center fill: parallel tracks over the field interior.
//!
//! The interior left inside the innermost headland pass is covered with
//! parallel tracks. Work happens in a rotated frame where the chosen
//! working angle is horizontal: scan lines of constant y are generated
//! over the bounding box, intersected with the interior outline, cut to
//! segments and discretised into waypoints. The non-convex cases are
//! handled by splitting the interior into [`blocks`](crate::Block) and
//! sequencing them along the headland.

pub mod angle;
pub mod blocks;
pub mod sequence;

use crate::geometry::{segment_intersection, Point, Polygon};
use crate::Coord;

/// Default spacing between consecutive waypoints on a track (meters).
pub const WAYPOINT_SPACING: Coord = 5.0;

/// Fraction of the spacing below which the track end point is considered
/// already reached by the last emitted waypoint.
const TAIL_FRACTION: Coord = 0.25;

/// A scan-line / interior-outline crossing, annotated with the ring edge
/// it lies on (plain index, no back-pointers).
#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub point: Point,
    /// 1-based index of the polygon edge (edge i runs from vertex i to
    /// vertex i+1).
    pub edge_index: usize,
}

/// One scan line in the rotated frame: a horizontal segment spanning the
/// bounding box, its crossings with the interior outline sorted by
/// ascending x, and the waypoints eventually emitted along it.
#[derive(Clone, Debug)]
pub struct Track {
    pub from: Point,
    pub to: Point,
    pub intersections: Vec<Intersection>,
    pub waypoints: Vec<Point>,
}

impl Track {
    fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            intersections: Vec::new(),
            waypoints: Vec::new(),
        }
    }
}

/// Generate horizontal scan lines over the polygon's bounding box at
/// `y = min_y + width/2 + k·width`.
pub fn generate_parallel_tracks(polygon: &Polygon, width: Coord) -> Vec<Track> {
    let bb = polygon.bounding_box();
    let mut tracks = Vec::new();
    let mut y = bb.min_y + width / 2.0;
    while y < bb.max_y {
        tracks.push(Track::new(
            Point::new(bb.min_x, y),
            Point::new(bb.max_x, y),
        ));
        y += width;
    }
    tracks
}

/// Intersect every scan line with the interior outline.
///
/// Walks the polygon edges once; each crossing is inserted into its scan
/// line's list in ascending-x order and annotated with the edge index.
pub fn find_intersections(polygon: &Polygon, tracks: &mut [Track]) {
    for i in 1..=polygon.len() as isize {
        let a = polygon.at(i).point;
        let b = polygon.at(i + 1).point;
        for track in tracks.iter_mut() {
            let Some(point) = segment_intersection(&track.from, &track.to, &a, &b) else {
                continue;
            };
            // A scan line through a vertex is reported by both adjacent
            // edges; keep only the first.
            if track
                .intersections
                .iter()
                .any(|x| x.point.coincides_with(&point))
            {
                continue;
            }
            let at = track
                .intersections
                .partition_point(|x| x.point.x < point.x);
            track.intersections.insert(
                at,
                Intersection {
                    point,
                    edge_index: i as usize,
                },
            );
        }
    }
}

/// Discretise each track into waypoints.
///
/// The drivable span pulls in half the implement width from both
/// crossings (minus the optional extension into the headland); waypoints
/// are emitted at `spacing` intervals and the end point is appended when
/// the last regular waypoint falls noticeably short of it. Tracks whose
/// span collapses are left without waypoints.
pub fn add_waypoints_to_tracks(
    tracks: &mut [Track],
    width: Coord,
    extend_tracks: Coord,
    spacing: Coord,
) {
    for track in tracks.iter_mut() {
        if track.intersections.len() < 2 {
            continue;
        }
        let x1 = track.intersections[0].point.x;
        let x2 = track.intersections[1].point.x;
        let new_from = x1.min(x2) + width / 2.0 - extend_tracks;
        let new_to = x1.max(x2) - width / 2.0 + extend_tracks;
        if new_to <= new_from {
            continue;
        }

        let y = track.from.y;
        let mut x = new_from;
        while x <= new_to {
            track.waypoints.push(Point::new(x, y));
            x += spacing;
        }
        let last_x = x - spacing;
        if new_to - last_x > TAIL_FRACTION * spacing {
            track.waypoints.push(Point::new(new_to, y));
        }
    }
}
