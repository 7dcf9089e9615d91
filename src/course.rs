//! Course export.
//!
//! The composed course is written as a flat XML document: one `<waypoint>`
//! element per point with the pass/track/turn annotations as attributes.
//! A JSON dump of the same records is available for tooling. Formatting is
//! done by hand; the schema is small and stable.

use crate::field::Field;
use crate::geometry::Vertex;
use crate::{Coord, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Serializable view of one course waypoint.
#[derive(Clone, Debug, Serialize)]
pub struct WaypointRecord {
    pub x: Coord,
    pub y: Coord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub turn_start: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub turn_end: bool,
}

impl From<&Vertex> for WaypointRecord {
    fn from(v: &Vertex) -> Self {
        Self {
            x: v.point.x,
            y: v.point.y,
            pass: v.pass_number,
            track: v.track_number,
            turn_start: v.turn_start,
            turn_end: v.turn_end,
        }
    }
}

/// Total driving length of a waypoint sequence (m).
pub fn course_length(course: &[Vertex]) -> Coord {
    course
        .windows(2)
        .map(|w| w[0].point.distance(&w[1].point))
        .sum()
}

/// Render the course as XML.
pub fn course_to_xml(field: &Field) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    let _ = writeln!(
        out,
        "<course waypoints=\"{}\" headlandPasses=\"{}\" tracks=\"{}\" angle=\"{}\">",
        field.course.len(),
        field.headland_tracks.len(),
        field.n_tracks,
        field
            .best_angle
            .map_or_else(|| "-".to_string(), |a| format!("{a:.0}")),
    );
    for vertex in &field.course {
        let _ = write!(out, "  <waypoint x=\"{:.3}\" y=\"{:.3}\"", vertex.point.x, vertex.point.y);
        if let Some(pass) = vertex.pass_number {
            let _ = write!(out, " pass=\"{pass}\"");
        }
        if let Some(track) = vertex.track_number {
            let _ = write!(out, " track=\"{track}\"");
        }
        if vertex.turn_start {
            out.push_str(" turnstart=\"1\"");
        }
        if vertex.turn_end {
            out.push_str(" turnend=\"1\"");
        }
        out.push_str("/>\n");
    }
    out.push_str("</course>\n");
    out
}

/// Write the course to an XML file.
pub fn write_course_to_file<P: AsRef<Path>>(field: &Field, path: P) -> Result<()> {
    fs::write(path, course_to_xml(field))?;
    Ok(())
}

/// Write the course waypoints to a JSON file.
pub fn write_course_to_json<P: AsRef<Path>>(field: &Field, path: P) -> Result<()> {
    let records: Vec<WaypointRecord> = field.course.iter().map(WaypointRecord::from).collect();
    fs::write(path, serde_json::to_string_pretty(&records)?)?;
    Ok(())
}
