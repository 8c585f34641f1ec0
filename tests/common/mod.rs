#![allow(dead_code)]

use batwalk::{Point, Room, Segment};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One segment pair with its expected intersection
#[derive(Debug, Clone, Deserialize)]
pub struct IntersectionCase {
    pub name: String,
    pub first: Segment,
    pub second: Segment,
    pub expected: Option<Point>,
}

/// Load intersection cases from a JSON fixture file
pub fn load_cases(path: &Path) -> Result<Vec<IntersectionCase>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let cases: Vec<IntersectionCase> = serde_json::from_str(&contents)?;
    Ok(cases)
}

fn map_case(case: &IntersectionCase, suffix: &str, f: impl Fn(Point) -> Point) -> IntersectionCase {
    let map_segment = |s: &Segment| Segment::new(f(s.start), f(s.end));
    IntersectionCase {
        name: format!("{}_{}", case.name, suffix),
        first: map_segment(&case.first),
        second: map_segment(&case.second),
        expected: case.expected.map(&f),
    }
}

/// Mirror a case left-right (x -> -x)
pub fn flip_case_horizontal(case: &IntersectionCase) -> IntersectionCase {
    map_case(case, "h_flip", |p| Point::new(-p.x, p.y))
}

/// Mirror a case top-bottom (y -> -y)
pub fn flip_case_vertical(case: &IntersectionCase) -> IntersectionCase {
    map_case(case, "v_flip", |p| Point::new(p.x, -p.y))
}

/// Mirror a case in both axes
pub fn flip_case_both(case: &IntersectionCase) -> IntersectionCase {
    map_case(case, "hv_flip", |p| Point::new(-p.x, -p.y))
}

pub fn points_close(a: Point, b: Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

pub fn rectangle_room(width: f64, height: f64) -> Room {
    Room::rectangle(width, height).expect("valid room dimensions")
}

/// Distance from `p` to the boundary of `[0, width] x [0, height]` along
/// `angle` degrees, computed directly from the ray equation
pub fn analytic_distance(p: Point, angle: f64, width: f64, height: f64) -> f64 {
    let (dy, dx) = angle.to_radians().sin_cos();
    let mut best = f64::INFINITY;
    if dx > 1e-12 {
        best = best.min((width - p.x) / dx);
    }
    if dx < -1e-12 {
        best = best.min(-p.x / dx);
    }
    if dy > 1e-12 {
        best = best.min((height - p.y) / dy);
    }
    if dy < -1e-12 {
        best = best.min(-p.y / dy);
    }
    best
}
