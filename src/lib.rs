//! # fieldcourse
//!
//! A coverage path planner for agricultural fields.
//!
//! Given the closed polygonal boundary of a field, an implement working
//! width and a handful of tunable parameters, the planner produces a
//! continuous ordered sequence of waypoints a vehicle can follow to cover
//! the whole interior:
//!
//! - a spiral *headland* path of one or more concentric passes along the
//!   boundary, generated by inward polygon offsetting, and
//! - an up/down *center* fill of parallel tracks at the best working angle,
//!   connected to the inner headland with turn-start/turn-end markers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fieldcourse::{generate_course_for_field, GeneratorConfig, Point};
//!
//! let field = fieldcourse::field::load_field("field.json")?;
//! let config = GeneratorConfig::new(6.0)
//!     .headland_passes(2)
//!     .start_location(Point::new(0.0, 0.0));
//! let planned = generate_course_for_field(field.boundary_points(), &config)?;
//! fieldcourse::course::write_course_to_file(&planned, "course.xml")?;
//! ```

// Core modules
pub mod center;
pub mod config;
pub mod course;
pub mod field;
pub mod generator;
pub mod geometry;
pub mod headland;
pub mod smooth;

// Re-export commonly used types
pub use center::angle::{find_best_track_angle, TrackCounts};
pub use center::blocks::{split_center_into_blocks, Block, Corner};
pub use center::sequence::{
    find_track_to_next_block, link_parallel_tracks, reorder_tracks_for_alternate_fieldwork,
};
pub use center::{
    add_waypoints_to_tracks, find_intersections, generate_parallel_tracks, Intersection, Track,
};
pub use config::GeneratorConfig;
pub use course::{course_length, write_course_to_file, write_course_to_json, WaypointRecord};
pub use field::{load_field, Field, FieldFile};
pub use generator::generate_course_for_field;
pub use geometry::{
    add_polar_vector, average_angle, circular_index, delta_angle, inward, normalize_angle,
    segment_intersection, to_polar, BoundingBox, Edge, Point, Polygon, PolygonIterator, Vertex,
};
pub use headland::link::{link_headland_tracks, HeadlandTrack};
pub use headland::{apply_low_pass_filter, calculate_headland_track};
pub use smooth::smooth;

/// Coordinate type used throughout the planner.
/// All geometry is in meters on a 2D Cartesian plane, 64-bit floats.
pub type Coord = f64;

/// Tolerance for floating-point equality comparisons.
pub const EPSILON: Coord = 1.0e-5;

/// Result type used throughout the planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for planner operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Field error: {0}")]
    Field(String),

    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Course error: {0}")]
    Course(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
