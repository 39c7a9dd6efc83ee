//! Software scene painter
//!
//! Projects the scene's world-space draw list through the core camera and
//! paints it with egui shapes. Triangles and edge outlines are depth-sorted
//! back to front; helper lines go underneath, sketch strokes and the
//! transform widget on top.

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use glam::DVec3;

use scene_editor_lib::scene::{DrawItem, FrameStats, Light, LightKind, LineRole, Material};
use scene_editor_lib::state::transform::GizmoAxis;
use scene_editor_lib::state::EditorState;
use scene_editor_lib::viewport::camera::{ArcBallCamera, ViewportRect};
use shared::Color;

/// Pull edge outlines slightly towards the camera so they win ties with their faces
const LINE_DEPTH_BIAS: f64 = 1e-4;
const HIGHLIGHT_MIX: f32 = 0.45;

pub fn viewport_rect(rect: Rect) -> ViewportRect {
    ViewportRect::new(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.width() as f64,
        rect.height() as f64,
    )
}

pub fn to_color32(color: Color, alpha: f64) -> Color32 {
    let [r, g, b] = color.to_rgb();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

fn axis_color(axis: GizmoAxis) -> Color32 {
    match axis {
        GizmoAxis::X => Color32::from_rgb(230, 60, 60),
        GizmoAxis::Y => Color32::from_rgb(60, 200, 60),
        GizmoAxis::Z => Color32::from_rgb(70, 110, 240),
    }
}

/// Two-sided Lambert shading plus highlight tint
fn shade(material: &Material, normal: DVec3, lights: &[Light]) -> Color32 {
    let mut light = 0.0;
    for l in lights {
        match l.kind {
            LightKind::Ambient => light += l.intensity,
            LightKind::Directional { direction } => {
                light += normal.dot(-direction).abs() * l.intensity;
            }
        }
    }
    let light = light.min(1.2) as f32;

    let mut rgb = material.color.to_rgb_f32().map(|c| (c * light).min(1.0));
    if let Some(tint) = material.emissive {
        for (c, t) in rgb.iter_mut().zip(tint.to_rgb_f32()) {
            *c = *c * (1.0 - HIGHLIGHT_MIX) + t * HIGHLIGHT_MIX;
        }
    }
    let [r, g, b] = rgb.map(|c| (c * 255.0) as u8);
    Color32::from_rgba_unmultiplied(r, g, b, (material.opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

enum Primitive {
    Triangle([Pos2; 3], Color32),
    Segment([Pos2; 2], Stroke),
}

struct Sorted {
    depth: f64,
    prim: Primitive,
}

fn to_pos(p: glam::DVec2) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

/// Project a segment; None when either end is behind the camera
fn project_segment(
    camera: &ArcBallCamera,
    rect: &ViewportRect,
    a: DVec3,
    b: DVec3,
) -> Option<([Pos2; 2], f64)> {
    let (pa, da) = camera.project(a, rect)?;
    let (pb, db) = camera.project(b, rect)?;
    Some(([to_pos(pa), to_pos(pb)], (da + db) * 0.5))
}

fn line_stroke(material: &Material, role: LineRole) -> Stroke {
    let width = match role {
        LineRole::Helper => 1.0,
        LineRole::EdgeOutline => 1.2,
        LineRole::SketchStroke => 2.0,
    };
    Stroke::new(width, to_color32(material.color, material.opacity))
}

/// Paint the scene into `rect` and return the frame statistics
pub fn paint_scene(painter: &Painter, rect: Rect, state: &EditorState) -> FrameStats {
    let scene = &state.scene;
    let camera = &scene.camera;
    let vp = viewport_rect(rect);

    painter.rect_filled(rect, 0.0, to_color32(scene.background, 1.0));

    let mut under: Vec<Shape> = Vec::new();
    let mut sorted: Vec<Sorted> = Vec::new();
    let mut over: Vec<Shape> = Vec::new();

    for item in scene.draw_list() {
        match item {
            DrawItem::Triangles { mesh, material, .. } => {
                for tri in 0..mesh.triangle_count() {
                    let corners = mesh.triangle(tri);
                    let projected: Option<Vec<(glam::DVec2, f64)>> =
                        corners.iter().map(|p| camera.project(*p, &vp)).collect();
                    let Some(projected) = projected else {
                        continue;
                    };
                    let pts = [
                        to_pos(projected[0].0),
                        to_pos(projected[1].0),
                        to_pos(projected[2].0),
                    ];
                    let depth = (projected[0].1 + projected[1].1 + projected[2].1) / 3.0;

                    if material.wireframe {
                        let stroke = Stroke::new(1.0, to_color32(material.color, 1.0));
                        let stroke = match material.emissive {
                            Some(tint) => Stroke::new(1.5, to_color32(tint, 1.0)),
                            None => stroke,
                        };
                        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                            sorted.push(Sorted {
                                depth,
                                prim: Primitive::Segment([pts[a], pts[b]], stroke),
                            });
                        }
                    } else {
                        let color = shade(&material, mesh.face_normal(tri), scene.lights());
                        sorted.push(Sorted {
                            depth,
                            prim: Primitive::Triangle(pts, color),
                        });
                    }
                }
            }
            DrawItem::Lines {
                points,
                material,
                role,
            } => {
                let stroke = line_stroke(&material, role);
                for pair in points.windows(2) {
                    let Some((seg, depth)) = project_segment(camera, &vp, pair[0], pair[1]) else {
                        continue;
                    };
                    match role {
                        LineRole::Helper => under.push(Shape::line_segment(seg, stroke)),
                        LineRole::SketchStroke => over.push(Shape::line_segment(seg, stroke)),
                        LineRole::EdgeOutline => sorted.push(Sorted {
                            depth: depth - LINE_DEPTH_BIAS,
                            prim: Primitive::Segment(seg, stroke),
                        }),
                    }
                }
            }
        }
    }

    // Transform widget
    let active = state.transform.active_axis();
    for (axis, [a, b]) in state.transform.handle_lines(scene) {
        if let Some((seg, _)) = project_segment(camera, &vp, a, b) {
            let width = if active == Some(axis) { 4.0 } else { 2.5 };
            over.push(Shape::line_segment(seg, Stroke::new(width, axis_color(axis))));
            over.push(Shape::circle_filled(seg[1], 4.0, axis_color(axis)));
        }
    }

    sorted.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    painter.extend(under);
    let mut batch = egui::Mesh::default();
    for item in sorted {
        match item.prim {
            Primitive::Triangle(pts, color) => {
                let base = batch.vertices.len() as u32;
                for p in pts {
                    batch.colored_vertex(p, color);
                }
                batch.add_triangle(base, base + 1, base + 2);
            }
            Primitive::Segment(seg, stroke) => {
                if !batch.is_empty() {
                    painter.add(Shape::mesh(std::mem::take(&mut batch)));
                }
                painter.line_segment(seg, stroke);
            }
        }
    }
    if !batch.is_empty() {
        painter.add(Shape::mesh(batch));
    }
    painter.extend(over);

    scene.render_frame()
}
