//! Linking concentric headland passes into one spiral.
//!
//! Each pass is a closed ring; the vehicle drives them as a single
//! continuous spiral. Starting from the ring vertex nearest the vehicle,
//! every pass is walked one full circle in the desired driving direction,
//! then a short ray cast toward the interior finds the entry point on the
//! next pass. The walked range is recorded on the pass so later stages
//! know where the spiral entered and left each ring.

use crate::geometry::{
    add_polar_vector, circular_index, inward, normalize_angle, segment_intersection, Point,
    Polygon, Vertex,
};
use crate::Coord;
use log::warn;
use std::f64::consts::PI;

/// One concentric headland pass, decorated after linking with the index
/// range and direction that was actually walked on it.
#[derive(Clone, Debug)]
pub struct HeadlandTrack {
    pub polygon: Polygon,
    /// First ring index the spiral visited on this pass.
    pub circle_start: Option<usize>,
    /// Last ring index the spiral visited on this pass.
    pub circle_end: Option<usize>,
    /// Walk direction on this pass: +1 or −1.
    pub circle_step: Option<isize>,
}

impl HeadlandTrack {
    /// Wrap a freshly generated offset ring, not yet linked.
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            circle_start: None,
            circle_end: None,
            circle_step: None,
        }
    }
}

/// Alternative headings tried for the inward bridge ray, in order.
const BRIDGE_HEADINGS: [Coord; 3] = [0.0, PI / 3.0, -PI / 3.0];

/// Compose the headland passes into one spiral path.
///
/// `desired_clockwise` is the driving direction the operator asked for;
/// each pass is walked forward or backward so the vehicle actually travels
/// that way regardless of ring orientation. `link_reach` bounds the inward
/// bridge ray (30 m by default). Returns the spiral as a decorated
/// waypoint sequence; on a link failure the remaining passes are omitted.
pub fn link_headland_tracks(
    tracks: &mut [HeadlandTrack],
    desired_clockwise: bool,
    start_location: &Point,
    do_smooth: bool,
    angle_threshold: Coord,
    smooth_iterations: usize,
    link_reach: Coord,
) -> Vec<Vertex> {
    let mut path: Vec<Vertex> = Vec::new();
    if tracks.is_empty() {
        return path;
    }

    let mut from_index = tracks[0].polygon.closest_index(start_location);
    let mut to_index = circular_index(tracks[0].polygon.len(), from_index as isize + 1);

    for i in 0..tracks.len() {
        let (walk_from, walk_to, step) = {
            let polygon = &tracks[i].polygon;
            if polygon.is_clockwise() == desired_clockwise {
                (to_index, from_index, 1)
            } else {
                (from_index, to_index, -1)
            }
        };

        for (_, vertex) in tracks[i].polygon.iter_range(walk_from, walk_to, step) {
            let mut vertex = vertex.clone();
            vertex.pass_number = Some(i + 1);
            path.push(vertex);
        }
        tracks[i].circle_start = Some(walk_from);
        tracks[i].circle_end = Some(walk_to);
        tracks[i].circle_step = Some(step);

        if i + 1 == tracks.len() {
            break;
        }

        let Some(position) = path.last() else { break };
        match bridge_to_next(
            position,
            tracks[i].polygon.is_clockwise(),
            &tracks[i + 1].polygon,
            link_reach,
        ) {
            Some((edge_index, point)) => {
                path.push(Vertex::with_pass(point, i + 2));
                from_index = edge_index;
                to_index = circular_index(tracks[i + 1].polygon.len(), edge_index as isize + 1);
            }
            None => {
                warn!(
                    "no bridge from headland pass {} to pass {} within {link_reach:.0}m, \
                     omitting inner passes",
                    i + 1,
                    i + 2
                );
                break;
            }
        }
    }

    if do_smooth && path.len() >= 3 {
        path = smooth_spiral(path, angle_threshold, smooth_iterations);
    }
    path
}

/// Cast a short ray toward the interior and find where it enters the next
/// pass. Tries the inward heading first, then ±60°. Returns the ring edge
/// index that was hit and the intersection point.
fn bridge_to_next(
    position: &Vertex,
    ring_clockwise: bool,
    next: &Polygon,
    reach: Coord,
) -> Option<(usize, Point)> {
    let heading = position
        .tangent
        .as_ref()
        .or(position.prev_edge.as_ref())
        .map(|e| e.angle)?
        + inward(ring_clockwise);

    for delta in BRIDGE_HEADINGS {
        let direction = normalize_angle(heading + delta);
        let ray_end = add_polar_vector(&position.point, direction, reach);

        let mut best: Option<(usize, Point, Coord)> = None;
        for j in 1..=next.len() {
            let a = next.at(j as isize).point;
            let b = next.at(j as isize + 1).point;
            if let Some(hit) = segment_intersection(&position.point, &ray_end, &a, &b) {
                let d = position.point.distance_squared(&hit);
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((j, hit, d));
                }
            }
        }
        if let Some((j, hit, _)) = best {
            return Some((j, hit));
        }
    }
    None
}

/// Smooth the spiral as an open path. Both ends are padded with duplicated
/// endpoints first so the smoother does not treat the path as a closed
/// loop, then the padding is stripped again.
fn smooth_spiral(path: Vec<Vertex>, angle_threshold: Coord, iterations: usize) -> Vec<Vertex> {
    let mut padded: Vec<Point> = Vec::with_capacity(path.len() + 2);
    padded.push(path[0].point);
    padded.extend(path.iter().map(|v| v.point));
    padded.push(path[path.len() - 1].point);

    let mut smoothed = crate::smooth::smooth(&padded, angle_threshold, iterations, false);
    smoothed.remove(0);
    smoothed.pop();

    // Corner cutting inserts points the original decorations do not cover;
    // each smoothed waypoint inherits the pass number of the nearest
    // original vertex.
    smoothed
        .into_iter()
        .map(|point| {
            let nearest = path
                .iter()
                .min_by(|a, b| {
                    a.point
                        .distance_squared(&point)
                        .total_cmp(&b.point.distance_squared(&point))
                })
                .and_then(|v| v.pass_number);
            Vertex {
                point,
                pass_number: nearest,
                ..Default::default()
            }
        })
        .collect()
}
