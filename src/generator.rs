//! The course generation pipeline.
//!
//! Orchestrates the full planning pass:
//! boundary → headland offsets → spiral linking → angle selection →
//! center fill → block sequencing → composed course.
//!
//! All geometric failure modes recover locally (fewer passes, headland
//! only, fallback angle); only an unusable boundary is an error.

use crate::center::angle::find_best_track_angle;
use crate::center::blocks::split_center_into_blocks;
use crate::center::sequence::{
    find_track_to_next_block, link_parallel_tracks, report_uncovered_blocks,
};
use crate::center::{add_waypoints_to_tracks, find_intersections, generate_parallel_tracks};
use crate::config::GeneratorConfig;
use crate::field::Field;
use crate::geometry::{circular_index, Point, Polygon, Vertex};
use crate::headland::calculate_headland_track;
use crate::headland::link::{link_headland_tracks, HeadlandTrack};
use crate::{Coord, Error, Result};
use log::{info, warn};

/// Plan a complete coverage course for a field boundary.
///
/// The boundary is a simple closed ring without holes, in meters. The
/// returned [`Field`] carries every intermediate product alongside the
/// composed course.
pub fn generate_course_for_field(boundary: Vec<Point>, config: &GeneratorConfig) -> Result<Field> {
    if boundary.len() < 3 {
        return Err(Error::Geometry(format!(
            "field boundary has only {} points, need at least 3",
            boundary.len()
        )));
    }

    let mut field = Field::new(Polygon::new(boundary));
    generate_headland(&mut field, config);

    let interior = field
        .headland_tracks
        .last()
        .map(|t| t.polygon.clone())
        .unwrap_or_else(|| field.boundary.clone());

    let spacing = config.track_spacing();
    let best_angle = find_best_track_angle(&interior, spacing).unwrap_or_else(|| {
        let fallback = interior
            .best_direction()
            .map_or(0.0, |d| d.dir as Coord)
            .rem_euclid(180.0);
        warn!("no valid track angle found, falling back to dominant direction {fallback:.0}°");
        fallback
    });
    field.best_angle = Some(best_angle);
    info!("center fill at {best_angle:.0}°, track spacing {spacing:.2}m");

    generate_center(&mut field, &interior, best_angle, spacing, config);

    field.course = field.headland_path.clone();
    field.course.extend(field.track.iter().cloned());
    Ok(field)
}

/// Generate and link the concentric headland passes.
///
/// The first pass offsets by half the implement width (or not at all when
/// the boundary itself serves as pass one), each further pass by the full
/// width. A pass that fails to offset ends the sequence early.
fn generate_headland(field: &mut Field, config: &GeneratorConfig) {
    let mut ring = field.boundary.clone();

    for pass in 0..config.n_headland_passes {
        let offset = if pass == 0 {
            if config.use_boundary_as_first_headland_pass {
                0.0
            } else {
                config.implement_width / 2.0
            }
        } else {
            config.implement_width
        };

        if offset > 0.0 {
            let next = calculate_headland_track(
                &ring,
                offset,
                config.min_vertex_distance,
                config.angle_threshold,
                config.do_smooth,
            );
            if same_ring(&next, &ring) {
                warn!(
                    "headland pass {} could not be offset, keeping {} passes",
                    pass + 1,
                    pass
                );
                break;
            }
            ring = next;
        }
        field.headland_tracks.push(HeadlandTrack::new(ring.clone()));
    }

    field.headland_path = link_headland_tracks(
        &mut field.headland_tracks,
        config.headland_clockwise,
        &config.start_location,
        config.do_smooth,
        config.angle_threshold,
        config.smooth_iterations,
        config.link_reach,
    );
}

fn same_ring(a: &Polygon, b: &Polygon) -> bool {
    a.len() == b.len()
        && a.vertices()
            .iter()
            .zip(b.vertices())
            .all(|(x, y)| x.point.coincides_with(&y.point))
}

/// Fill the interior with parallel tracks at the chosen angle.
///
/// Works in the rotated frame where the tracks are horizontal: scan
/// lines, blocks, then the sequencing walk from the spiral exit point.
/// All produced waypoints are rotated back before they land on the field.
fn generate_center(
    field: &mut Field,
    interior: &Polygon,
    angle_degrees: Coord,
    spacing: Coord,
    config: &GeneratorConfig,
) {
    let rotation = -angle_degrees.to_radians();
    let rotated = interior.rotated(rotation);

    let mut scanlines = generate_parallel_tracks(&rotated, spacing);
    find_intersections(&rotated, &mut scanlines);
    let mut blocks = split_center_into_blocks(&mut scanlines);
    field.n_tracks = blocks.iter().map(|b| b.tracks.len()).sum();
    if blocks.is_empty() {
        info!("interior has no workable tracks, course is headland only");
        return;
    }

    let exit_point = field
        .headland_path
        .last()
        .map(|v| v.point)
        .unwrap_or(config.start_location)
        .rotated(rotation);

    // Keep turning the same way the spiral was driven.
    let step = field
        .headland_tracks
        .last()
        .and_then(|t| t.circle_step)
        .unwrap_or(if interior.is_clockwise() == config.headland_clockwise {
            1
        } else {
            -1
        });

    let mut from = rotated.closest_index(&exit_point);
    let mut to = circular_index(rotated.len(), from as isize - step);
    let mut center: Vec<Vertex> = Vec::new();

    while let Some((next_from, next_to, block_index)) =
        find_track_to_next_block(&mut blocks, &rotated, from, to, step)
    {
        let block = &mut blocks[block_index];
        add_waypoints_to_tracks(
            &mut block.tracks,
            spacing,
            config.extend_tracks,
            config.waypoint_spacing,
        );
        center.extend(block.track_to_this_block.iter().cloned());
        field.connecting_tracks.push(block.track_to_this_block.clone());
        link_parallel_tracks(&mut center, block, config.n_tracks_to_skip);
        from = next_from;
        to = next_to;
    }
    report_uncovered_blocks(&blocks);

    let back = angle_degrees.to_radians();
    for vertex in center.iter_mut() {
        vertex.point = vertex.point.rotated(back);
    }
    for path in field.connecting_tracks.iter_mut() {
        for vertex in path.iter_mut() {
            vertex.point = vertex.point.rotated(back);
        }
    }
    field.track = center;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPSILON;

    fn square_boundary(side: Coord) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ]
    }

    /// The convex-square scenario: 100×100 field, 10m implement, two
    /// headland passes, start at the origin, no track skipping.
    #[test]
    fn test_square_coverage() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(2)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();

        // Two concentric rectangular passes at 5m and 15m.
        assert_eq!(field.headland_tracks.len(), 2);
        let outer = field.headland_tracks[0].polygon.bounding_box();
        assert!((outer.min_x - 5.0).abs() < 0.01);
        assert!((outer.max_x - 95.0).abs() < 0.01);
        let inner = field.headland_tracks[1].polygon.bounding_box();
        assert!((inner.min_x - 15.0).abs() < 0.01);
        assert!((inner.max_x - 85.0).abs() < 0.01);

        // One block of 7 tracks across the [15, 85]² interior.
        assert_eq!(field.best_angle, Some(0.0));
        assert_eq!(field.n_tracks, 7);
        assert_eq!(field.connecting_tracks.len(), 1);

        // Track waypoints sit on the scan lines y = 20, 30, …, 80.
        for vertex in field.track.iter().filter(|v| v.track_number.is_some()) {
            let y = vertex.point.y;
            let offset = (y - 20.0) / 10.0;
            assert!(
                (offset - offset.round()).abs() < 1e-6 && (0.0..=6.0).contains(&offset),
                "unexpected track y {y}"
            );
        }

        // The course is the spiral followed by the center fill.
        assert_eq!(
            field.course.len(),
            field.headland_path.len() + field.track.len()
        );
        assert!(!field.headland_path.is_empty());
    }

    #[test]
    fn test_square_course_alternates_direction() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(2)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();

        let mut directions: Vec<bool> = Vec::new();
        for track in 1..=field.n_tracks {
            let points: Vec<&Vertex> = field
                .track
                .iter()
                .filter(|v| v.track_number == Some(track))
                .collect();
            assert!(points.len() >= 2, "track {track} too short");
            directions.push(points.first().unwrap().point.x < points.last().unwrap().point.x);
        }
        for pair in directions.windows(2) {
            assert_ne!(pair[0], pair[1], "consecutive tracks share a direction");
        }
    }

    #[test]
    fn test_headland_passes_nest_strictly() {
        let config = GeneratorConfig::new(8.0)
            .headland_passes(3)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(200.0), &config).unwrap();
        assert_eq!(field.headland_tracks.len(), 3);
        for pair in field.headland_tracks.windows(2) {
            let outer = &pair[0].polygon;
            let inner = &pair[1].polygon;
            for vertex in inner.vertices() {
                assert!(
                    outer.contains_point(&vertex.point),
                    "{:?} not inside the previous pass",
                    vertex.point
                );
            }
        }
    }

    #[test]
    fn test_no_headland_covers_from_boundary() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(0)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();
        assert!(field.headland_tracks.is_empty());
        assert!(field.headland_path.is_empty());
        assert_eq!(field.n_tracks, 10);
        assert!(!field.track.is_empty());
        assert_eq!(field.course.len(), field.track.len());
    }

    #[test]
    fn test_boundary_as_first_pass() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(2)
            .boundary_as_first_pass(true)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();
        assert_eq!(field.headland_tracks.len(), 2);
        // Pass one is the boundary itself; pass two a full width inward.
        let first = field.headland_tracks[0].polygon.bounding_box();
        assert!(first.min_x.abs() < EPSILON);
        let second = field.headland_tracks[1].polygon.bounding_box();
        assert!((second.min_x - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_tiny_boundary_rejected() {
        let config = GeneratorConfig::new(10.0);
        let result = generate_course_for_field(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_narrow_field_degrades_to_headland_only() {
        // 12m wide: two 5m+10m offsets cannot fit, and the interior that
        // remains is too narrow for any track.
        let boundary = vec![
            Point::new(0.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 12.0),
            Point::new(0.0, 12.0),
        ];
        let config = GeneratorConfig::new(10.0)
            .headland_passes(1)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(boundary, &config).unwrap();
        // Whatever the headland managed, the course exists and is exactly
        // as long as its parts.
        assert_eq!(
            field.course.len(),
            field.headland_path.len() + field.track.len()
        );
    }

    #[test]
    fn test_skip_pattern_still_covers_everything() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(2)
            .skip_tracks(1)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();
        // All 7 tracks appear exactly once.
        let mut seen: Vec<Coord> = field
            .track
            .iter()
            .filter(|v| v.track_number.is_some())
            .map(|v| v.point.y)
            .collect();
        seen.sort_by(Coord::total_cmp);
        seen.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_course_stays_inside_boundary() {
        let config = GeneratorConfig::new(10.0)
            .headland_passes(2)
            .start_location(Point::new(0.0, 0.0));
        let field = generate_course_for_field(square_boundary(100.0), &config).unwrap();
        let boundary = &field.boundary;
        for vertex in &field.course {
            assert!(
                boundary.contains_point(&vertex.point),
                "{:?} outside the field",
                vertex.point
            );
        }
    }
}
