use egui::{Painter, Pos2, Rect, Vec2};
use log::{debug, info, warn};

use super::RoiTool;
use crate::command::Command;
use crate::error::TransitionError;
use crate::geometry::{clamp_to_surface, hit_test_handles, Polygon, Vertex};
use crate::renderer::Renderer;
use crate::state::PolygonState;

/// Drawing surface size of the polygon variant
pub const POLYGON_SURFACE_SIZE: Vec2 = Vec2::new(800.0, 450.0);

/// Polygon ROI capture over the live stream.
///
/// Vertices are placed on release. Releasing on an existing handle closes
/// the polygon and submits it; after that, handles can be dragged to
/// reshape it and every finished drag submits the full list again.
#[derive(Debug, Clone)]
pub struct PolygonRoiTool {
    state: PolygonState,
    /// Cursor position for the dashed edge from the last vertex
    preview: Option<Pos2>,
    surface_size: Vec2,
}

impl Default for PolygonRoiTool {
    fn default() -> Self {
        Self::new(POLYGON_SURFACE_SIZE)
    }
}

impl PolygonRoiTool {
    pub fn new(surface_size: Vec2) -> Self {
        Self {
            state: PolygonState::Empty,
            preview: None,
            surface_size,
        }
    }

    pub fn state(&self) -> &PolygonState {
        &self.state
    }

    pub fn preview(&self) -> Option<Pos2> {
        self.preview
    }

    /// Move to `new_state`, logging instead of failing on a rejected transition
    fn transition(&mut self, new_state: PolygonState) -> bool {
        match self.state.transition_to(new_state) {
            Ok(()) => true,
            Err(err) => {
                warn!("Polygon tool: {}", err);
                false
            }
        }
    }

    fn place_vertex(&mut self, pos: Pos2) -> Option<Command> {
        let mut vertices = self.state.vertices().to_vec();
        vertices.push(Vertex::new(pos));
        self.transition(PolygonState::Drawing { vertices });
        None
    }

    fn close(&mut self) -> Option<Command> {
        let polygon = Polygon::new(self.state.vertices().to_vec());
        if !self.transition(PolygonState::Closed {
            polygon: polygon.clone(),
            dragging: None,
        }) {
            return None;
        }
        self.preview = None;
        info!("Polygon closed with {} vertices", polygon.len());
        Some(submit(&polygon))
    }

    /// Finish a handle drag and submit the reshaped polygon
    fn end_drag(&mut self) -> Option<Command> {
        let PolygonState::Closed { polygon, dragging: Some(id) } = &self.state else {
            return None;
        };
        debug!("Finished dragging vertex {:?}", id);
        let polygon = polygon.clone();
        self.transition(PolygonState::Closed {
            polygon: polygon.clone(),
            dragging: None,
        })
        .then(|| submit(&polygon))
    }
}

fn submit(polygon: &Polygon) -> Command {
    if !polygon.is_simple() {
        warn!("Submitting a polygon ROI that is not simple ({} vertices)", polygon.len());
    }
    Command::RecordRoi {
        points: polygon.to_roi_points(),
    }
}

impl RoiTool for PolygonRoiTool {
    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn current_state_name(&self) -> &'static str {
        self.state.name()
    }

    fn on_pointer_down(&mut self, pos: Pos2) -> Option<Command> {
        let PolygonState::Closed { polygon, dragging: None } = &self.state else {
            return None;
        };
        let id = hit_test_handles(pos, polygon.vertices())?;
        debug!("Started dragging vertex {:?}", id);
        let polygon = polygon.clone();
        self.transition(PolygonState::Closed {
            polygon,
            dragging: Some(id),
        });
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> Option<Command> {
        let surface_size = self.surface_size;
        match &mut self.state {
            PolygonState::Drawing { .. } => self.preview = Some(pos),
            PolygonState::Closed { polygon, dragging: Some(id) } => {
                let target = clamp_to_surface(pos, surface_size);
                if !polygon.move_vertex(*id, target) {
                    warn!("Polygon tool: {}", TransitionError::UnknownVertex(id.as_uuid()));
                }
            }
            _ => {}
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2) -> Option<Command> {
        if self.state.is_dragging() {
            return self.end_drag();
        }
        if self.state.is_closed() {
            return None;
        }
        if hit_test_handles(pos, self.state.vertices()).is_some() {
            self.close()
        } else {
            self.place_vertex(pos)
        }
    }

    fn on_pointer_leave(&mut self, _last_pos: Pos2) -> Option<Command> {
        self.preview = None;
        if self.state.is_dragging() {
            return self.end_drag();
        }
        None
    }

    fn clear(&mut self) {
        self.preview = None;
        self.transition(PolygonState::Empty);
        info!("Cleared polygon ROI");
    }

    fn draw(&self, renderer: &Renderer, painter: &Painter, surface: Rect) {
        match &self.state {
            PolygonState::Empty => {}
            PolygonState::Drawing { vertices } => {
                let points: Vec<Pos2> = vertices.iter().map(|v| v.pos).collect();
                renderer.render_polyline(painter, surface, &points);
                if let (Some(last), Some(cursor)) = (points.last(), self.preview) {
                    renderer.render_preview_edge(painter, surface, *last, cursor);
                }
                renderer.render_handles(painter, surface, vertices, None);
            }
            PolygonState::Closed { polygon, dragging } => {
                renderer.render_closed_polygon(painter, surface, polygon);
                renderer.render_handles(painter, surface, polygon.vertices(), *dragging);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RoiPoint;

    fn click(tool: &mut PolygonRoiTool, x: f32, y: f32) -> Option<Command> {
        let pos = Pos2::new(x, y);
        tool.on_pointer_down(pos);
        tool.on_pointer_up(pos)
    }

    fn triangle() -> PolygonRoiTool {
        let mut tool = PolygonRoiTool::default();
        click(&mut tool, 10.0, 10.0);
        click(&mut tool, 100.0, 10.0);
        click(&mut tool, 100.0, 100.0);
        tool
    }

    fn points(coords: &[(i32, i32)]) -> Vec<RoiPoint> {
        coords.iter().map(|&(x, y)| RoiPoint { x, y }).collect()
    }

    #[test]
    fn test_click_first_handle_closes_and_submits() {
        let mut tool = triangle();
        assert!(tool.state().is_drawing());
        assert_eq!(tool.state().vertices().len(), 3);

        let command = click(&mut tool, 10.0, 10.0);
        assert_eq!(
            command,
            Some(Command::RecordRoi {
                points: points(&[(10, 10), (100, 10), (100, 100)]),
            })
        );
        assert!(tool.state().is_closed());
    }

    #[test]
    fn test_preview_is_not_committed() {
        let mut tool = triangle();
        tool.on_pointer_move(Pos2::new(40.0, 90.0));
        assert_eq!(tool.preview(), Some(Pos2::new(40.0, 90.0)));

        let Some(Command::RecordRoi { points }) = click(&mut tool, 100.0, 100.0) else {
            panic!("expected the polygon to close");
        };
        assert_eq!(points.len(), 3);
        assert!(tool.preview().is_none());
    }

    #[test]
    fn test_drag_moves_only_that_vertex() {
        let mut tool = triangle();
        click(&mut tool, 10.0, 10.0);

        assert!(tool.on_pointer_down(Pos2::new(100.0, 10.0)).is_none());
        assert_eq!(tool.current_state_name(), "Dragging");
        tool.on_pointer_move(Pos2::new(150.0, 30.0));
        let command = tool.on_pointer_up(Pos2::new(150.0, 30.0));

        assert_eq!(
            command,
            Some(Command::RecordRoi {
                points: points(&[(10, 10), (150, 30), (100, 100)]),
            })
        );
        assert_eq!(tool.current_state_name(), "Closed");
    }

    #[test]
    fn test_drag_is_clamped_to_surface() {
        let mut tool = triangle();
        click(&mut tool, 10.0, 10.0);
        tool.on_pointer_down(Pos2::new(100.0, 100.0));
        tool.on_pointer_move(Pos2::new(900.0, -20.0));
        let Some(Command::RecordRoi { points }) = tool.on_pointer_leave(Pos2::new(799.0, 0.0)) else {
            panic!("leaving while dragging should submit");
        };
        assert_eq!(points[2], RoiPoint { x: 800, y: 0 });
        assert!(!tool.state().is_dragging());
    }

    #[test]
    fn test_closed_polygon_ignores_clicks_off_handles() {
        let mut tool = triangle();
        click(&mut tool, 10.0, 10.0);
        assert!(click(&mut tool, 400.0, 300.0).is_none());
        assert_eq!(tool.state().vertices().len(), 3);
    }

    #[test]
    fn test_clear_starts_fresh() {
        let mut tool = triangle();
        click(&mut tool, 10.0, 10.0);
        tool.clear();
        assert!(tool.state().is_empty());

        click(&mut tool, 200.0, 200.0);
        assert_eq!(tool.state().vertices().len(), 1);
        assert_eq!(tool.state().vertices()[0].pos, Pos2::new(200.0, 200.0));
    }

    #[test]
    fn test_press_while_drawing_does_nothing() {
        let mut tool = triangle();
        assert!(tool.on_pointer_down(Pos2::new(10.0, 10.0)).is_none());
        assert!(tool.state().is_drawing());
    }
}
