//! Sequencing blocks along the inner headland.
//!
//! After the spiral is driven, the vehicle sits on the innermost headland
//! pass. From there it walks the ring until it meets an uncovered block
//! corner, works that block with alternating track directions (optionally
//! skipping tracks for wider turns), leaves at the parity-determined exit
//! corner and keeps walking for the next block.

use super::blocks::{Block, Corner};
use super::Track;
use crate::geometry::{circular_index, Polygon, Vertex};
use log::warn;

/// Walk the inner headland from `from` toward `to` looking for the next
/// uncovered block.
///
/// On a hit the block is marked covered, its entry directions are set from
/// the corner met, and the walked sub-path (plus the entry corner point)
/// is stored on the block. Returns the new walk range for the following
/// search and the index of the entered block; `None` once a full walk
/// meets no uncovered corner.
pub fn find_track_to_next_block(
    blocks: &mut [Block],
    headland: &Polygon,
    from: usize,
    to: usize,
    step: isize,
) -> Option<(usize, usize, usize)> {
    let mut walked: Vec<Vertex> = Vec::new();

    for (index, vertex) in headland.iter_range(from, to, step) {
        walked.push(Vertex::new(vertex.point));
        for (block_index, block) in blocks.iter_mut().enumerate() {
            if block.covered {
                continue;
            }
            let Some(entry) = block.corner_at_edge(index) else {
                continue;
            };

            block.covered = true;
            let (bottom_to_top, left_to_right) = match entry {
                Corner::BottomLeft => (true, true),
                Corner::BottomRight => (true, false),
                Corner::TopLeft => (false, true),
                Corner::TopRight => (false, false),
            };
            block.bottom_to_top = bottom_to_top;
            block.left_to_right = left_to_right;

            walked.push(Vertex::new(block.corner(entry).point));
            block.track_to_this_block = walked;

            let exit = block.exit_corner(entry);
            let new_from = block.corner(exit).edge_index;
            let new_to = circular_index(headland.len(), new_from as isize - step);
            return Some((new_from, new_to, block_index));
        }
    }
    None
}

/// Reorder a block's tracks for skip-N fieldwork.
///
/// Visits every (N+1)-th track forward, then sweeps backward over the
/// remaining ones, repeating from the first unvisited track until every
/// track is placed. With N = 0 the order is unchanged.
pub fn reorder_tracks_for_alternate_fieldwork<T>(tracks: Vec<T>, n_skip: usize) -> Vec<T> {
    let n = tracks.len();
    let stride = n_skip + 1;
    let mut visited = vec![false; n + 1];
    let mut order: Vec<usize> = Vec::with_capacity(n);

    while order.len() < n {
        let Some(start) = (1..=n).find(|&i| !visited[i]) else {
            break;
        };
        let mut i = start;
        let mut last = start;
        while i <= n {
            if !visited[i] {
                visited[i] = true;
                order.push(i);
                last = i;
            }
            i += stride;
        }
        let mut j = last as isize + 1;
        while j >= 1 {
            let index = j as usize;
            if index <= n && !visited[index] {
                visited[index] = true;
                order.push(index);
            }
            j -= stride as isize;
        }
    }

    let mut slots: Vec<Option<T>> = tracks.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i - 1].take())
        .collect()
}

/// Append a block's waypoints to the course with alternating direction
/// and turn markers.
///
/// Track order is flipped for top-down entries, the skip-N permutation is
/// applied, and waypoints are reversed on every second track so traversal
/// alternates (starting with the second track when entering from the
/// left). The first waypoint of every non-initial track is a turn end,
/// the last waypoint of every non-final track a turn start.
pub fn link_parallel_tracks(result: &mut Vec<Vertex>, block: &Block, n_skip: usize) {
    let mut tracks: Vec<Track> = block
        .tracks
        .iter()
        .filter(|t| !t.waypoints.is_empty())
        .cloned()
        .collect();
    if !block.bottom_to_top {
        tracks.reverse();
    }
    let mut tracks = reorder_tracks_for_alternate_fieldwork(tracks, n_skip);

    for (i, track) in tracks.iter_mut().enumerate() {
        let reversed = if block.left_to_right {
            i % 2 == 1
        } else {
            i % 2 == 0
        };
        if reversed {
            track.waypoints.reverse();
        }
    }

    let track_count = tracks.len();
    for (i, track) in tracks.iter().enumerate() {
        let waypoint_count = track.waypoints.len();
        for (j, point) in track.waypoints.iter().enumerate() {
            let mut vertex = Vertex::new(*point);
            vertex.track_number = Some(i + 1);
            vertex.turn_end = j == 0 && i > 0;
            vertex.turn_start = j + 1 == waypoint_count && i + 1 < track_count;
            result.push(vertex);
        }
    }
}

/// Log any blocks left uncovered after sequencing; a non-convex interior
/// can become unreachable mid-sequence.
pub fn report_uncovered_blocks(blocks: &[Block]) {
    let uncovered = blocks.iter().filter(|b| !b.covered).count();
    if uncovered > 0 {
        warn!("{uncovered} of {} interior blocks left uncovered", blocks.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::center::{find_intersections, generate_parallel_tracks};
    use crate::geometry::{Point, Polygon};

    fn reorder_indices(n: usize, n_skip: usize) -> Vec<usize> {
        let tracks: Vec<usize> = (1..=n).collect();
        reorder_tracks_for_alternate_fieldwork(tracks, n_skip)
    }

    #[test]
    fn test_reorder_no_skip() {
        assert_eq!(reorder_indices(5, 0), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reorder_verified_patterns() {
        assert_eq!(reorder_indices(6, 1), vec![1, 3, 5, 6, 4, 2]);
        assert_eq!(reorder_indices(6, 2), vec![1, 4, 5, 2, 3, 6]);
        assert_eq!(reorder_indices(11, 1), vec![1, 3, 5, 7, 9, 11, 10, 8, 6, 4, 2]);
        assert_eq!(reorder_indices(11, 2), vec![1, 4, 7, 10, 11, 8, 5, 2, 3, 6, 9]);
        assert_eq!(reorder_indices(11, 3), vec![1, 5, 9, 10, 6, 2, 3, 7, 11, 8, 4]);
    }

    #[test]
    fn test_reorder_is_permutation() {
        for n in [1usize, 2, 5, 8, 13, 17] {
            for n_skip in 0..5 {
                let out = reorder_indices(n, n_skip);
                assert_eq!(out.len(), n, "n={n} skip={n_skip}");
                let mut sorted = out.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, (1..=n).collect::<Vec<_>>(), "n={n} skip={n_skip}");
            }
        }
    }

    fn square_block(width: f64) -> (Polygon, Vec<Block>) {
        let polygon = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        let mut tracks = generate_parallel_tracks(&polygon, width);
        find_intersections(&polygon, &mut tracks);
        let blocks = crate::center::blocks::split_center_into_blocks(&mut tracks);
        (polygon, blocks)
    }

    #[test]
    fn test_sequencer_enters_first_corner_met() {
        let (polygon, mut blocks) = square_block(20.0);
        assert_eq!(blocks.len(), 1);
        // Walk counterclockwise from vertex 1 (0,0): the bottom-right
        // corner (on edge 2) is met at vertex 2.
        let to = circular_index(polygon.len(), 0);
        let hit = find_track_to_next_block(&mut blocks, &polygon, 1, to, 1);
        let (new_from, new_to, block_index) = hit.unwrap();
        let block = &blocks[block_index];
        assert!(block.covered);
        assert!(block.bottom_to_top);
        assert!(!block.left_to_right);
        // 5 tracks (odd): exit on the opposite vertical side, top-left,
        // which lies on edge 4.
        assert_eq!(new_from, 4);
        assert_eq!(new_to, 3);
        // Sub-path: vertices 1 and 2, then the entry corner point.
        assert_eq!(block.track_to_this_block.len(), 3);
        assert!(block.track_to_this_block[2]
            .point
            .coincides_with(&Point::new(100.0, 10.0)));
    }

    #[test]
    fn test_sequencer_returns_none_when_all_covered() {
        let (polygon, mut blocks) = square_block(20.0);
        let to = circular_index(polygon.len(), 0);
        assert!(find_track_to_next_block(&mut blocks, &polygon, 1, to, 1).is_some());
        let (from, to, _) = (4, 3, 0);
        assert!(find_track_to_next_block(&mut blocks, &polygon, from, to, 1).is_none());
    }

    #[test]
    fn test_link_alternates_direction() {
        let (_, mut blocks) = square_block(20.0);
        crate::center::add_waypoints_to_tracks(&mut blocks[0].tracks, 10.0, 0.0, 5.0);
        let block = &mut blocks[0];
        block.covered = true;
        block.bottom_to_top = true;
        block.left_to_right = true;

        let mut course: Vec<Vertex> = Vec::new();
        link_parallel_tracks(&mut course, block, 0);
        assert!(!course.is_empty());

        // First track left to right, second right to left.
        let first: Vec<&Vertex> = course
            .iter()
            .filter(|v| v.track_number == Some(1))
            .collect();
        assert!(first.first().unwrap().point.x < first.last().unwrap().point.x);
        let second: Vec<&Vertex> = course
            .iter()
            .filter(|v| v.track_number == Some(2))
            .collect();
        assert!(second.first().unwrap().point.x > second.last().unwrap().point.x);
    }

    #[test]
    fn test_turn_markers() {
        let (_, mut blocks) = square_block(20.0);
        crate::center::add_waypoints_to_tracks(&mut blocks[0].tracks, 10.0, 0.0, 5.0);
        let block = &blocks[0];
        let mut course: Vec<Vertex> = Vec::new();
        link_parallel_tracks(&mut course, block, 0);

        let n_tracks = block.tracks.len();
        let turn_starts = course.iter().filter(|v| v.turn_start).count();
        let turn_ends = course.iter().filter(|v| v.turn_end).count();
        assert_eq!(turn_starts, n_tracks - 1);
        assert_eq!(turn_ends, n_tracks - 1);
        // The very first and last waypoints carry no markers.
        assert!(!course.first().unwrap().turn_start);
        assert!(!course.first().unwrap().turn_end);
        assert!(!course.last().unwrap().turn_start);
        assert!(!course.last().unwrap().turn_end);
    }

    #[test]
    fn test_top_down_entry_reverses_track_order() {
        let (_, mut blocks) = square_block(20.0);
        crate::center::add_waypoints_to_tracks(&mut blocks[0].tracks, 10.0, 0.0, 5.0);
        let block = &mut blocks[0];
        block.bottom_to_top = false;
        block.left_to_right = true;

        let mut course: Vec<Vertex> = Vec::new();
        link_parallel_tracks(&mut course, block, 0);
        // The first linked track is the topmost scan line (y = 90).
        assert!((course[0].point.y - 90.0).abs() < 1e-9);
    }
}
