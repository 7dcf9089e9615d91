//! Planner configuration.
//!
//! All tunables of the course generator in one place, with defaults that
//! match a mid-size implement. Builder-style setters allow call sites to
//! adjust only what they need.

use crate::geometry::Point;
use crate::Coord;
use std::f64::consts::PI;

/// Default reach of the ray bridging one headland pass to the next (m).
pub const LINK_REACH: Coord = 30.0;

/// Configuration for [`generate_course_for_field`](crate::generate_course_for_field).
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Transverse working width of the implement (m). Governs headland
    /// offsets and center track spacing.
    pub implement_width: Coord,

    /// Number of concentric headland passes.
    pub n_headland_passes: usize,

    /// Desired driving direction on the headland spiral.
    pub headland_clockwise: bool,

    /// Where the vehicle enters the field; the spiral starts at the
    /// nearest boundary vertex.
    pub start_location: Point,

    /// Overlap between adjacent center tracks, in percent of the width.
    pub overlap_percent: Coord,

    /// Use the boundary itself as the first headland pass instead of
    /// offsetting it inward by half the width.
    pub use_boundary_as_first_headland_pass: bool,

    /// Skip-N pattern for the center: work every (N+1)-th track, then
    /// fill backwards. 0 works neighbouring tracks.
    pub n_tracks_to_skip: usize,

    /// Extend center tracks into the headland by this much (m).
    pub extend_tracks: Coord,

    /// Vertices closer than this are merged during offsetting (m).
    pub min_vertex_distance: Coord,

    /// Corners sharper than this are smoothed / filtered (radians).
    pub angle_threshold: Coord,

    /// Smooth headland rings and the spiral path.
    pub do_smooth: bool,

    /// Spacing between consecutive waypoints on a track (m).
    pub waypoint_spacing: Coord,

    /// Reach of the inward ray bridging headland passes (m).
    pub link_reach: Coord,

    /// Refinement passes of the corner smoother.
    pub smooth_iterations: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl GeneratorConfig {
    /// Create a configuration for the given implement width.
    pub fn new(implement_width: Coord) -> Self {
        Self {
            implement_width,
            n_headland_passes: 2,
            headland_clockwise: false,
            start_location: Point::new(0.0, 0.0),
            overlap_percent: 0.0,
            use_boundary_as_first_headland_pass: false,
            n_tracks_to_skip: 0,
            extend_tracks: 0.0,
            min_vertex_distance: 0.5,
            angle_threshold: PI / 6.0,
            do_smooth: false,
            waypoint_spacing: crate::center::WAYPOINT_SPACING,
            link_reach: LINK_REACH,
            smooth_iterations: 3,
        }
    }

    /// Builder: number of headland passes.
    pub fn headland_passes(mut self, n: usize) -> Self {
        self.n_headland_passes = n;
        self
    }

    /// Builder: headland driving direction.
    pub fn clockwise(mut self, clockwise: bool) -> Self {
        self.headland_clockwise = clockwise;
        self
    }

    /// Builder: vehicle start location.
    pub fn start_location(mut self, location: Point) -> Self {
        self.start_location = location;
        self
    }

    /// Builder: track overlap percentage.
    pub fn overlap_percent(mut self, percent: Coord) -> Self {
        self.overlap_percent = percent.clamp(0.0, 99.0);
        self
    }

    /// Builder: use the boundary as the first headland pass.
    pub fn boundary_as_first_pass(mut self, yes: bool) -> Self {
        self.use_boundary_as_first_headland_pass = yes;
        self
    }

    /// Builder: skip-N track pattern.
    pub fn skip_tracks(mut self, n: usize) -> Self {
        self.n_tracks_to_skip = n;
        self
    }

    /// Builder: track extension into the headland.
    pub fn extend_tracks(mut self, meters: Coord) -> Self {
        self.extend_tracks = meters;
        self
    }

    /// Builder: corner smoothing on/off.
    pub fn smoothing(mut self, on: bool) -> Self {
        self.do_smooth = on;
        self
    }

    /// Effective spacing between center tracks after overlap (m).
    pub fn track_spacing(&self) -> Coord {
        self.implement_width * (1.0 - self.overlap_percent / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_spacing_with_overlap() {
        let config = GeneratorConfig::new(10.0).overlap_percent(10.0);
        assert!((config.track_spacing() - 9.0).abs() < crate::EPSILON);
        let config = GeneratorConfig::new(10.0);
        assert!((config.track_spacing() - 10.0).abs() < crate::EPSILON);
    }

    #[test]
    fn test_builders() {
        let config = GeneratorConfig::new(6.0)
            .headland_passes(3)
            .clockwise(true)
            .skip_tracks(1)
            .boundary_as_first_pass(true);
        assert_eq!(config.n_headland_passes, 3);
        assert!(config.headland_clockwise);
        assert_eq!(config.n_tracks_to_skip, 1);
        assert!(config.use_boundary_as_first_headland_pass);
    }
}
