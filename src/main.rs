//! fieldcourse CLI - plan coverage courses for field boundaries
//!
//! Usage:
//!   fieldcourse plan <field.json> -o <course.xml> [options]
//!   fieldcourse plan <field.json> --width 6 --headland-passes 2 --skip 1
//!   fieldcourse info <field.json>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldcourse::{
    course_length, generate_course_for_field, load_field, write_course_to_file,
    write_course_to_json, GeneratorConfig, Point,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::time::Duration;

/// Coverage path planner for agricultural fields
#[derive(Parser, Debug)]
#[command(name = "fieldcourse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan a coverage course for a field
    Plan {
        /// Input field file (JSON)
        #[arg(value_name = "FIELD")]
        input: PathBuf,

        /// Output course file (XML)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Also write the course as JSON
        #[arg(long, value_name = "JSON")]
        json: Option<PathBuf>,

        /// Implement working width in meters
        #[arg(long, default_value = "6.0")]
        width: f64,

        /// Number of headland passes
        #[arg(long, default_value = "2")]
        headland_passes: usize,

        /// Drive the headland clockwise
        #[arg(long)]
        clockwise: bool,

        /// Vehicle start location, x coordinate
        #[arg(long, default_value = "0.0")]
        start_x: f64,

        /// Vehicle start location, y coordinate
        #[arg(long, default_value = "0.0")]
        start_y: f64,

        /// Track overlap in percent of the width
        #[arg(long, default_value = "0")]
        overlap: f64,

        /// Skip N tracks between passes for wider turns
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Extend center tracks into the headland (m)
        #[arg(long, default_value = "0.0")]
        extend: f64,

        /// Use the boundary itself as the first headland pass
        #[arg(long)]
        boundary_pass: bool,

        /// Disable corner smoothing
        #[arg(long)]
        no_smooth: bool,
    },

    /// Print statistics about a field file
    Info {
        /// Input field file (JSON)
        #[arg(value_name = "FIELD")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Plan {
            input,
            output,
            json,
            width,
            headland_passes,
            clockwise,
            start_x,
            start_y,
            overlap,
            skip,
            extend,
            boundary_pass,
            no_smooth,
        } => cmd_plan(
            input,
            output,
            json,
            width,
            headland_passes,
            clockwise,
            start_x,
            start_y,
            overlap,
            skip,
            extend,
            boundary_pass,
            no_smooth,
        ),
        Commands::Info { input } => cmd_info(input),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    input: PathBuf,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    width: f64,
    headland_passes: usize,
    clockwise: bool,
    start_x: f64,
    start_y: f64,
    overlap: f64,
    skip: usize,
    extend: f64,
    boundary_pass: bool,
    no_smooth: bool,
) -> Result<()> {
    let field_file = load_field(&input)
        .with_context(|| format!("failed to load field from {}", input.display()))?;
    let name = field_file.name.clone().unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "field".to_string())
    });

    // Metadata stored with the field takes precedence over flag defaults.
    let width = field_file.width.unwrap_or(width);
    let passes = field_file.n_headland_passes.unwrap_or(headland_passes);
    let clockwise = field_file.is_clockwise.unwrap_or(clockwise);

    let config = GeneratorConfig::new(width)
        .headland_passes(passes)
        .clockwise(clockwise)
        .start_location(Point::new(start_x, start_y))
        .overlap_percent(overlap)
        .skip_tracks(skip)
        .extend_tracks(extend)
        .boundary_as_first_pass(boundary_pass)
        .smoothing(!no_smooth);

    info!("planning '{name}': width {width}m, {passes} headland passes");

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("invalid progress template")?,
    );
    progress.set_message(format!("planning course for '{name}'..."));
    progress.enable_steady_tick(Duration::from_millis(100));

    let field = generate_course_for_field(field_file.boundary_points(), &config)
        .with_context(|| format!("failed to plan a course for '{name}'"))?;

    progress.finish_and_clear();

    println!("Course for '{name}':");
    println!("  waypoints:       {}", field.course.len());
    println!("  headland passes: {}", field.headland_tracks.len());
    println!("  center tracks:   {}", field.n_tracks);
    if let Some(angle) = field.best_angle {
        println!("  work angle:      {angle:.0}°");
    }
    println!("  length:          {:.0} m", course_length(&field.course));
    let turns = field.course.iter().filter(|v| v.turn_start).count();
    println!("  turns:           {turns}");

    if let Some(path) = output {
        write_course_to_file(&field, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Course written to {}", path.display());
    }
    if let Some(path) = json {
        write_course_to_json(&field, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Course written to {}", path.display());
    }

    Ok(())
}

fn cmd_info(input: PathBuf) -> Result<()> {
    let field_file = load_field(&input)
        .with_context(|| format!("failed to load field from {}", input.display()))?;

    let boundary = fieldcourse::Polygon::new(field_file.boundary_points());
    let bb = boundary.bounding_box();

    println!("Field: {}", field_file.name.as_deref().unwrap_or("(unnamed)"));
    println!("  boundary points: {}", boundary.len());
    println!(
        "  extent:          {:.0} x {:.0} m",
        bb.width(),
        bb.height()
    );
    println!(
        "  orientation:     {}",
        if boundary.is_clockwise() {
            "clockwise"
        } else {
            "counterclockwise"
        }
    );
    println!("  shortest edge:   {:.1} m", boundary.shortest_edge_length());
    if let Some(best) = boundary.best_direction() {
        println!("  main direction:  {}° ({:.0} m of edges)", best.dir, best.length);
    }
    if let Some(width) = field_file.width {
        println!("  suggested width: {width} m");
    }
    if let Some(passes) = field_file.n_headland_passes {
        println!("  suggested headland passes: {passes}");
    }

    Ok(())
}
