//! Field input and planner output aggregate.
//!
//! A field file is a small JSON document carrying the boundary ring and
//! optional planning metadata; only those are consumed. The [`Field`]
//! aggregate owns everything the planner derives: headland rings, the
//! spiral path, the center fill and the composed course.

use crate::geometry::{BoundingBox, Point, Polygon, Vertex};
use crate::headland::link::HeadlandTrack;
use crate::{Coord, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk field description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldFile {
    #[serde(default)]
    pub name: Option<String>,
    /// Closed boundary ring, meters. The wrap from last to first point is
    /// implicit.
    pub boundary: Vec<Point>,
    /// Suggested number of headland passes.
    #[serde(default)]
    pub n_headland_passes: Option<usize>,
    /// Suggested implement width (m).
    #[serde(default)]
    pub width: Option<Coord>,
    /// Suggested headland driving direction.
    #[serde(default)]
    pub is_clockwise: Option<bool>,
}

impl FieldFile {
    /// The raw boundary ring.
    pub fn boundary_points(&self) -> Vec<Point> {
        self.boundary.clone()
    }
}

/// Load a field file from disk.
pub fn load_field<P: AsRef<Path>>(path: P) -> Result<FieldFile> {
    let text = fs::read_to_string(path)?;
    let field: FieldFile = serde_json::from_str(&text)?;
    if field.boundary.len() < 3 {
        return Err(Error::Field(format!(
            "boundary has only {} points, need at least 3",
            field.boundary.len()
        )));
    }
    Ok(field)
}

/// Everything the planner produces for one field.
///
/// Created by [`generate_course_for_field`](crate::generate_course_for_field)
/// and immutable afterwards.
#[derive(Clone, Debug)]
pub struct Field {
    /// Analysed boundary ring.
    pub boundary: Polygon,
    /// Concentric headland passes, outermost first.
    pub headland_tracks: Vec<HeadlandTrack>,
    /// The linked headland spiral.
    pub headland_path: Vec<Vertex>,
    /// Center fill: connecting sub-paths and parallel-track waypoints in
    /// driving order.
    pub track: Vec<Vertex>,
    /// The headland sub-paths routing the vehicle into each block.
    pub connecting_tracks: Vec<Vec<Vertex>>,
    /// The complete course: headland spiral followed by the center fill.
    pub course: Vec<Vertex>,
    /// Chosen working angle for the center fill (degrees).
    pub best_angle: Option<Coord>,
    /// Total number of center tracks over all blocks.
    pub n_tracks: usize,
    /// Bounding box of the boundary.
    pub bounding_box: BoundingBox,
    /// Orientation of the boundary ring.
    pub is_clockwise: bool,
}

impl Field {
    /// Wrap an analysed boundary, with all derived data still empty.
    pub fn new(boundary: Polygon) -> Self {
        let bounding_box = *boundary.bounding_box();
        let is_clockwise = boundary.is_clockwise();
        Self {
            boundary,
            headland_tracks: Vec::new(),
            headland_path: Vec::new(),
            track: Vec::new(),
            connecting_tracks: Vec::new(),
            course: Vec::new(),
            best_angle: None,
            n_tracks: 0,
            bounding_box,
            is_clockwise,
        }
    }
}
