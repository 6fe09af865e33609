use earcutr::earcut;
use egui::{pos2, Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke, TextureId};

use crate::geometry::{Polygon, RectRoi, Vertex, VertexId};
use crate::widgets::VertexHandle;

/// Paints ROI overlays onto a surface.
///
/// All positions handed to the renderer are surface-local; `surface` is the
/// surface's current screen rectangle.
#[derive(Debug, Clone)]
pub struct Renderer {
    rect_stroke: Stroke,
    polyline_stroke: Stroke,
    preview_stroke: Stroke,
    polygon_fill: Color32,
    polygon_stroke: Stroke,
    empty_background: Color32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            rect_stroke: Stroke::new(3.0, Color32::BLUE),
            polyline_stroke: Stroke::new(2.0, Color32::from_rgb(255, 200, 0)),
            preview_stroke: Stroke::new(1.5, Color32::from_rgb(255, 200, 0)),
            polygon_fill: Color32::from_rgba_unmultiplied(0, 160, 255, 80),
            polygon_stroke: Stroke::new(2.0, Color32::from_rgb(0, 160, 255)),
            empty_background: Color32::from_gray(24),
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect_stroke(&self) -> Stroke {
        self.rect_stroke
    }

    /// Draw a camera frame stretched over the surface, or a placeholder while
    /// no frame has arrived
    pub fn render_background(&self, painter: &Painter, surface: Rect, texture: Option<TextureId>) {
        match texture {
            Some(texture_id) => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(texture_id, surface, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(surface, 0.0, self.empty_background);
                painter.text(
                    surface.center(),
                    Align2::CENTER_CENTER,
                    "No image",
                    FontId::proportional(14.0),
                    Color32::GRAY,
                );
            }
        }
    }

    /// Single stroke of the rectangle ROI
    pub fn render_rectangle(&self, painter: &Painter, surface: Rect, roi: &RectRoi) {
        painter.rect_stroke(roi.to_screen(surface.min), 0.0, self.rect_stroke);
    }

    /// Open polyline through the vertices placed so far
    pub fn render_polyline(&self, painter: &Painter, surface: Rect, points: &[Pos2]) {
        if points.len() < 2 {
            return;
        }
        let screen = points.iter().map(|p| to_screen(surface, *p)).collect();
        painter.add(Shape::line(screen, self.polyline_stroke));
    }

    /// Dashed edge from the last vertex to the cursor
    pub fn render_preview_edge(&self, painter: &Painter, surface: Rect, from: Pos2, to: Pos2) {
        let points = [to_screen(surface, from), to_screen(surface, to)];
        painter.extend(Shape::dashed_line(&points, self.preview_stroke, 6.0, 4.0));
    }

    pub fn render_handles(
        &self,
        painter: &Painter,
        surface: Rect,
        vertices: &[Vertex],
        active: Option<VertexId>,
    ) {
        for vertex in vertices {
            VertexHandle::new(to_screen(surface, vertex.pos))
                .active(active == Some(vertex.id))
                .paint(painter);
        }
    }

    /// Filled semi-transparent polygon with its outline
    pub fn render_closed_polygon(&self, painter: &Painter, surface: Rect, polygon: &Polygon) {
        if polygon.len() < 2 {
            return;
        }
        painter.add(Shape::mesh(self.polygon_mesh(polygon, surface.min)));
        let outline = polygon.points().into_iter().map(|p| to_screen(surface, p)).collect();
        painter.add(Shape::closed_line(outline, self.polygon_stroke));
    }

    /// Triangle mesh covering `polygon`, offset by the surface origin.
    ///
    /// Self-intersecting outlines are filled as far as earcut gets with them.
    pub fn polygon_mesh(&self, polygon: &Polygon, origin: Pos2) -> Mesh {
        let points = polygon.points();
        let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let indices = earcut(&flat, &[], 2).unwrap_or_default();

        let mut mesh = Mesh::default();
        for point in points {
            mesh.colored_vertex(origin + point.to_vec2(), self.polygon_fill);
        }
        mesh.indices = indices.into_iter().map(|i| i as u32).collect();
        mesh
    }
}

fn to_screen(surface: Rect, pos: Pos2) -> Pos2 {
    surface.min + pos.to_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_covers_polygon() {
        let polygon = Polygon::new(vec![
            Vertex::new(Pos2::new(0.0, 0.0)),
            Vertex::new(Pos2::new(10.0, 0.0)),
            Vertex::new(Pos2::new(10.0, 10.0)),
            Vertex::new(Pos2::new(0.0, 10.0)),
        ]);
        let mesh = Renderer::new().polygon_mesh(&polygon, Pos2::new(100.0, 50.0));

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices[2].pos, Pos2::new(110.0, 60.0));
        assert!(mesh.vertices.iter().all(|v| v.color.a() < 255));
    }

    #[test]
    fn test_mesh_fills_concave_polygon() {
        // An L shape, concave at (5, 5)
        let polygon = Polygon::new(
            [(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0), (5.0, 10.0), (0.0, 10.0)]
                .into_iter()
                .map(|(x, y)| Vertex::new(Pos2::new(x, y)))
                .collect(),
        );
        let mesh = Renderer::new().polygon_mesh(&polygon, Pos2::ZERO);
        assert_eq!(mesh.indices.len(), 12);

        let area: f32 = mesh
            .indices
            .chunks(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.vertices[i as usize].pos);
                ((b - a).x * (c - a).y - (b - a).y * (c - a).x).abs() / 2.0
            })
            .sum();
        assert!((area - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_mesh_needs_three_points() {
        let polygon = Polygon::new(vec![Vertex::new(Pos2::new(0.0, 0.0)), Vertex::new(Pos2::new(5.0, 5.0))]);
        assert!(Renderer::new().polygon_mesh(&polygon, Pos2::ZERO).indices.is_empty());
    }

    #[test]
    fn test_rectangle_stroke_is_blue() {
        let stroke = Renderer::new().rect_stroke();
        assert_eq!(stroke.color, Color32::BLUE);
        assert_eq!(stroke.width, 3.0);
    }
}
