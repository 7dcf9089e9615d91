//! Working-angle selection for the center fill.
//!
//! Every even angle in [0°, 178°] is evaluated by rotating the interior
//! outline so that candidate tracks become horizontal, generating scan
//! lines and scoring the outcome. Fewer blocks, fewer tiny blocks and
//! fewer split scan lines are all preferable to raw track count, hence
//! the weights.

use super::blocks::split_center_into_blocks;
use super::{find_intersections, generate_parallel_tracks, Track};
use crate::geometry::Polygon;
use crate::Coord;
use log::debug;

/// Step between evaluated angles (degrees).
pub const ANGLE_SCAN_STEP: usize = 2;

/// Blocks with fewer tracks than this count as small in the score.
pub const SMALL_BLOCK_TRACK_LIMIT: usize = 5;

/// Scan-line statistics for one candidate angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackCounts {
    /// Scan lines crossing the outline exactly twice.
    pub n_full: usize,
    /// Scan lines crossing more than twice (they get split over blocks).
    pub n_split: usize,
}

/// Count full and split scan lines.
pub fn count_tracks(tracks: &[Track]) -> TrackCounts {
    let mut counts = TrackCounts::default();
    for track in tracks {
        match track.intersections.len() {
            0 | 1 => {}
            2 => counts.n_full += 1,
            _ => counts.n_split += 1,
        }
    }
    counts
}

/// Find the working angle (degrees) minimising the coverage score.
///
/// Score per angle: `50·small_blocks + 20·blocks + 5·split + full`; ties
/// are broken by the smallest angle. Returns `None` when no angle yields
/// a block at all (caller falls back to the dominant edge direction).
pub fn find_best_track_angle(interior: &Polygon, width: Coord) -> Option<Coord> {
    let mut best: Option<(usize, usize)> = None;

    for angle in (0..180).step_by(ANGLE_SCAN_STEP) {
        let rotated = interior.rotated(-(angle as Coord).to_radians());
        let mut tracks = generate_parallel_tracks(&rotated, width);
        find_intersections(&rotated, &mut tracks);

        let counts = count_tracks(&tracks);
        let blocks = split_center_into_blocks(&mut tracks);
        if blocks.is_empty() {
            continue;
        }
        let n_small = blocks
            .iter()
            .filter(|b| b.tracks.len() < SMALL_BLOCK_TRACK_LIMIT)
            .count();

        let score =
            50 * n_small + 20 * blocks.len() + 5 * counts.n_split + counts.n_full;
        debug!(
            "angle {angle}°: {} blocks ({n_small} small), {} split, {} full, score {score}",
            blocks.len(),
            counts.n_split,
            counts.n_full
        );

        if best.map_or(true, |(_, s)| score < s) {
            best = Some((angle, score));
        }
    }

    best.map(|(angle, _)| angle as Coord)
}
