//! Work-plane profiles for the sketch tools
//!
//! Profiles live in the work-plane's local 2D frame (u = world X, v = world Z)
//! and are always centered on the origin; the caller places them in the world.
//! Every ring, outer boundary and holes alike, is counter-clockwise in (u, v).

use std::f64::consts::TAU;

use glam::DVec3;
use kurbo::{BezPath, Point, Rect, Shape};
use serde::{Deserialize, Serialize};
use shared::{ShapeKind, ShapeParams};

/// Samples used for circles and ellipses
pub const CURVE_SEGMENTS: usize = 64;

/// Smallest inner radius / inset used for hollow shapes
pub const MIN_HOLLOW_SIZE: f64 = 0.01;

/// Largest inner size of a hollow shape relative to its outer size
const MAX_HOLLOW_RATIO: f64 = 0.9;

/// Sketch drawing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchTool {
    Rectangle,
    Circle,
    Triangle,
    Ellipse,
    Polygon,
}

impl SketchTool {
    pub const ALL: [SketchTool; 5] = [
        SketchTool::Rectangle,
        SketchTool::Circle,
        SketchTool::Triangle,
        SketchTool::Ellipse,
        SketchTool::Polygon,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Ellipse => "Ellipse",
            Self::Polygon => "Polygon",
        }
    }

    /// Metadata kind of a flat shape drawn with this tool
    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle => ShapeKind::SketchRectangle,
            Self::Circle => ShapeKind::SketchCircle,
            Self::Triangle => ShapeKind::SketchTriangle,
            Self::Ellipse => ShapeKind::SketchEllipse,
            Self::Polygon => ShapeKind::SketchPolygon,
        }
    }
}

/// Tool-specific options for profile construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileOptions {
    pub hollow: bool,
    /// Requested polygon side count (floored, at least 3)
    pub polygon_sides: f64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            hollow: false,
            polygon_sides: 6.0,
        }
    }
}

/// Closed 2D outline with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    pub outer: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl Profile2D {
    /// Closed path of one ring
    fn ring_path(ring: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = ring.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }

    /// Bounding rectangle of the outer boundary
    pub fn bounds(&self) -> Rect {
        Self::ring_path(&self.outer).bounding_box()
    }

    /// Bounding rectangle of a hole
    pub fn hole_bounds(&self, index: usize) -> Option<Rect> {
        self.holes.get(index).map(|h| Self::ring_path(h).bounding_box())
    }

    /// Filled area: outer minus holes
    pub fn area(&self) -> f64 {
        let outer = Self::ring_path(&self.outer).area().abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| Self::ring_path(h).area().abs())
            .sum();
        (outer - holes).max(0.0)
    }

    /// True when the outer boundary encloses no area (zero-length drags)
    pub fn is_degenerate(&self) -> bool {
        Self::ring_path(&self.outer).area().abs() < 1e-9
    }

    /// True when every hole is strictly smaller than the outer boundary on both axes
    pub fn holes_fit(&self) -> bool {
        let outer = self.bounds();
        self.holes.iter().all(|h| {
            let inner = Self::ring_path(h).bounding_box();
            inner.width() < outer.width() && inner.height() < outer.height()
        })
    }

    /// Number of boundary segments over all rings
    pub fn segment_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Copy of the profile scaled about the origin
    pub fn scaled(&self, factor: f64) -> Profile2D {
        let scale = |ring: &Vec<Point>| -> Vec<Point> {
            ring.iter()
                .map(|p| Point::new(p.x * factor, p.y * factor))
                .collect()
        };
        Profile2D {
            outer: scale(&self.outer),
            holes: self.holes.iter().map(scale).collect(),
        }
    }
}

/// Regular ring of `count` points on an ellipse, starting at angle 0
fn elliptic_ring(rx: f64, ry: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let a = i as f64 * TAU / count as f64;
            Point::new(rx * a.cos(), ry * a.sin())
        })
        .collect()
}

fn rectangle_ring(half_w: f64, half_d: f64) -> Vec<Point> {
    vec![
        Point::new(-half_w, -half_d),
        Point::new(half_w, -half_d),
        Point::new(half_w, half_d),
        Point::new(-half_w, half_d),
    ]
}

fn triangle_ring(w: f64, d: f64) -> Vec<Point> {
    vec![
        Point::new(-w / 2.0, -d / 2.0),
        Point::new(w / 2.0, -d / 2.0),
        Point::new(0.0, d / 2.0),
    ]
}

/// Inner size of a hollow shape: `fraction` of the outer size, floored at
/// MIN_HOLLOW_SIZE but never reaching the outer size
fn hollow_extent(outer: f64, fraction: f64) -> f64 {
    (outer * fraction)
        .max(MIN_HOLLOW_SIZE)
        .min(outer * MAX_HOLLOW_RATIO)
}

/// Planar (XZ) distance between two anchors
fn planar_distance(start: DVec3, end: DVec3) -> f64 {
    let dx = end.x - start.x;
    let dz = end.z - start.z;
    (dx * dx + dz * dz).sqrt()
}

/// Effective polygon side count for a requested value, within 3..=MAX_POLYGON_SIDES
pub fn polygon_sides(requested: f64) -> u32 {
    if !requested.is_finite() {
        return 3;
    }
    requested.floor().clamp(3.0, shared::MAX_POLYGON_SIDES as f64) as u32
}

/// Build the profile a tool produces for a drag from `start` to `end`.
///
/// Pure and deterministic. A zero-length drag yields a degenerate profile;
/// rejecting it is up to the caller.
pub fn build_profile(
    tool: SketchTool,
    start: DVec3,
    end: DVec3,
    options: &ProfileOptions,
) -> Profile2D {
    let w = (end.x - start.x).abs();
    let d = (end.z - start.z).abs();

    match tool {
        SketchTool::Rectangle => {
            let mut holes = Vec::new();
            if options.hollow {
                // Walls keep at least a tenth of the half-size open
                let inset_w = (w * 0.08).max(MIN_HOLLOW_SIZE).min(w * 0.4);
                let inset_d = (d * 0.08).max(MIN_HOLLOW_SIZE).min(d * 0.4);
                holes.push(rectangle_ring(
                    (w / 2.0 - inset_w).max(0.0),
                    (d / 2.0 - inset_d).max(0.0),
                ));
            }
            Profile2D {
                outer: rectangle_ring(w / 2.0, d / 2.0),
                holes,
            }
        }
        SketchTool::Circle => {
            let r = planar_distance(start, end);
            let mut holes = Vec::new();
            if options.hollow {
                let inner = hollow_extent(r, 0.6);
                holes.push(elliptic_ring(inner, inner, CURVE_SEGMENTS));
            }
            Profile2D {
                outer: elliptic_ring(r, r, CURVE_SEGMENTS),
                holes,
            }
        }
        SketchTool::Triangle => {
            let mut holes = Vec::new();
            if options.hollow {
                holes.push(triangle_ring(w * 0.6, d * 0.6));
            }
            Profile2D {
                outer: triangle_ring(w, d),
                holes,
            }
        }
        SketchTool::Ellipse => {
            let mut holes = Vec::new();
            if options.hollow {
                holes.push(elliptic_ring(
                    hollow_extent(w, 0.6),
                    hollow_extent(d, 0.6),
                    CURVE_SEGMENTS,
                ));
            }
            Profile2D {
                outer: elliptic_ring(w, d, CURVE_SEGMENTS),
                holes,
            }
        }
        SketchTool::Polygon => {
            let sides = polygon_sides(options.polygon_sides) as usize;
            let r = planar_distance(start, end);
            let mut holes = Vec::new();
            if options.hollow {
                let inner = hollow_extent(r, 0.5);
                holes.push(elliptic_ring(inner, inner, sides));
            }
            Profile2D {
                outer: elliptic_ring(r, r, sides),
                holes,
            }
        }
    }
}

/// World-space placement origin of a drawn shape (on the work-plane, y = 0).
/// Rectangles are centered between the anchors, everything else on `start`.
pub fn placement_origin(tool: SketchTool, start: DVec3, end: DVec3) -> DVec3 {
    match tool {
        SketchTool::Rectangle => DVec3::new((start.x + end.x) / 2.0, 0.0, (start.z + end.z) / 2.0),
        _ => DVec3::new(start.x, 0.0, start.z),
    }
}

/// Metadata parameters describing a drawn shape
pub fn sketch_params(
    tool: SketchTool,
    start: DVec3,
    end: DVec3,
    options: &ProfileOptions,
) -> ShapeParams {
    let w = (end.x - start.x).abs();
    let d = (end.z - start.z).abs();
    let hollow = options.hollow;

    match tool {
        SketchTool::Rectangle => ShapeParams::SketchRectangle {
            width: w,
            depth: d,
            hollow,
        },
        SketchTool::Circle => ShapeParams::SketchCircle {
            radius: planar_distance(start, end),
            hollow,
        },
        SketchTool::Triangle => ShapeParams::SketchTriangle {
            width: w,
            depth: d,
            hollow,
        },
        SketchTool::Ellipse => ShapeParams::SketchEllipse {
            radius_x: w,
            radius_z: d,
            hollow,
        },
        SketchTool::Polygon => ShapeParams::SketchPolygon {
            radius: planar_distance(start, end),
            sides: polygon_sides(options.polygon_sides),
            hollow,
        },
    }
}

/// Re-derive a profile from stored sketch parameters.
/// None for kinds whose parameters do not describe a profile.
pub fn profile_for_params(params: &ShapeParams) -> Option<Profile2D> {
    let hollow = params.is_hollow();
    let (tool, end, sides) = match *params {
        ShapeParams::SketchRectangle { width, depth, .. } => {
            (SketchTool::Rectangle, DVec3::new(width, 0.0, depth), 6)
        }
        ShapeParams::SketchCircle { radius, .. } => {
            (SketchTool::Circle, DVec3::new(radius, 0.0, 0.0), 6)
        }
        ShapeParams::SketchTriangle { width, depth, .. } => {
            (SketchTool::Triangle, DVec3::new(width, 0.0, depth), 6)
        }
        ShapeParams::SketchEllipse {
            radius_x, radius_z, ..
        } => (SketchTool::Ellipse, DVec3::new(radius_x, 0.0, radius_z), 6),
        ShapeParams::SketchPolygon { radius, sides, .. } => {
            (SketchTool::Polygon, DVec3::new(radius, 0.0, 0.0), sides)
        }
        _ => return None,
    };

    let options = ProfileOptions {
        hollow,
        polygon_sides: sides as f64,
    };
    Some(build_profile(tool, DVec3::ZERO, end, &options))
}
