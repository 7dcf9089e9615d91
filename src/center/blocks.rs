//! Splitting the interior into blocks.
//!
//! A block is a maximal run of consecutive scan lines that all x-overlap,
//! workable without re-entering the headland. Non-convex interiors yield
//! several blocks: every pass over the scan lines consumes the two
//! leftmost crossings of each line until a line no longer overlaps the
//! one below it, then the remaining crossings are left for later passes.

use super::{Intersection, Track};
use crate::geometry::Vertex;

/// The four corners of a block, in the rotated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// A contiguous slice of the interior: consecutive overlapping tracks
/// plus the corner crossings used to connect it to the headland.
#[derive(Clone, Debug)]
pub struct Block {
    pub tracks: Vec<Track>,
    pub bottom_left: Intersection,
    pub bottom_right: Intersection,
    pub top_left: Intersection,
    pub top_right: Intersection,
    /// Set once the sequencer has routed the vehicle into this block.
    pub covered: bool,
    /// Entry direction: first track at the bottom.
    pub bottom_to_top: bool,
    /// Entry direction: first track driven toward ascending x.
    pub left_to_right: bool,
    /// Headland sub-path leading from the previous exit to this block.
    pub track_to_this_block: Vec<Vertex>,
}

impl Block {
    fn from_tracks(tracks: Vec<Track>) -> Self {
        let first = &tracks[0];
        let last = &tracks[tracks.len() - 1];
        Self {
            bottom_left: first.intersections[0],
            bottom_right: first.intersections[1],
            top_left: last.intersections[0],
            top_right: last.intersections[1],
            covered: false,
            bottom_to_top: true,
            left_to_right: true,
            track_to_this_block: Vec::new(),
            tracks,
        }
    }

    /// The crossing record at a given corner.
    pub fn corner(&self, corner: Corner) -> &Intersection {
        match corner {
            Corner::BottomLeft => &self.bottom_left,
            Corner::BottomRight => &self.bottom_right,
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
        }
    }

    /// Which corner, if any, lies on the given headland edge. Checked in
    /// bottom-left, bottom-right, top-left, top-right order.
    pub fn corner_at_edge(&self, edge_index: usize) -> Option<Corner> {
        [
            Corner::BottomLeft,
            Corner::BottomRight,
            Corner::TopLeft,
            Corner::TopRight,
        ]
        .into_iter()
        .find(|&c| self.corner(c).edge_index == edge_index)
    }

    /// Corner where the vehicle leaves after working all tracks: the
    /// opposite horizontal side, on the entry's vertical side when the
    /// track count is even, the opposite one when it is odd.
    pub fn exit_corner(&self, entry: Corner) -> Corner {
        let even = self.tracks.len() % 2 == 0;
        match entry {
            Corner::BottomLeft => {
                if even {
                    Corner::TopLeft
                } else {
                    Corner::TopRight
                }
            }
            Corner::BottomRight => {
                if even {
                    Corner::TopRight
                } else {
                    Corner::TopLeft
                }
            }
            Corner::TopLeft => {
                if even {
                    Corner::BottomLeft
                } else {
                    Corner::BottomRight
                }
            }
            Corner::TopRight => {
                if even {
                    Corner::BottomRight
                } else {
                    Corner::BottomLeft
                }
            }
        }
    }
}

/// Check whether two tracks' crossing spans overlap in x.
pub fn overlaps(a: &Track, b: &Track) -> bool {
    let (a1, a2) = (a.intersections[0].point.x, a.intersections[1].point.x);
    let (b1, b2) = (b.intersections[0].point.x, b.intersections[1].point.x);
    a1 <= b2 && b1 <= a2
}

/// Partition the scan lines into blocks.
///
/// Repeatedly sweeps the scan lines bottom to top, taking the two
/// leftmost remaining crossings of each line; a line that does not
/// overlap the previous one ends the current block and stays for the
/// next sweep. Terminates when a sweep collects nothing.
pub fn split_center_into_blocks(scanlines: &mut [Track]) -> Vec<Block> {
    let mut blocks = Vec::new();

    loop {
        let mut tracks: Vec<Track> = Vec::new();
        for line in scanlines.iter_mut() {
            if line.intersections.len() < 2 {
                continue;
            }
            let candidate = Track {
                from: line.from,
                to: line.to,
                intersections: line.intersections[0..2].to_vec(),
                waypoints: Vec::new(),
            };
            if let Some(previous) = tracks.last() {
                if !overlaps(&candidate, previous) {
                    break;
                }
            }
            line.intersections.drain(0..2);
            tracks.push(candidate);
        }
        if tracks.is_empty() {
            break;
        }
        blocks.push(Block::from_tracks(tracks));
    }

    blocks
}
