use egui::{Color32, CursorIcon, Painter, Pos2, Stroke};

use crate::geometry::HANDLE_RADIUS;

const HANDLE_COLOR: Color32 = Color32::from_rgb(30, 120, 255);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(255, 140, 0);

/// The circle drawn at each polygon vertex
pub struct VertexHandle {
    position: Pos2,
    radius: f32,
    active: bool,
}

impl VertexHandle {
    pub fn new(position: Pos2) -> Self {
        Self {
            position,
            radius: HANDLE_RADIUS,
            active: false,
        }
    }

    /// Mark the handle as the one being dragged
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn fill(&self) -> Color32 {
        if self.active {
            ACTIVE_COLOR
        } else {
            HANDLE_COLOR
        }
    }

    pub fn paint(&self, painter: &Painter) {
        painter.circle_filled(self.position, self.radius, self.fill());
        painter.circle_stroke(self.position, self.radius, Stroke::new(1.0, Color32::WHITE));
    }

    /// Cursor to show while hovering a handle
    pub fn cursor_icon(dragging: bool) -> CursorIcon {
        if dragging {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Grab
        }
    }
}
