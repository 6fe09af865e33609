use egui::{Painter, Pos2, Rect, Vec2};
use log::{debug, info};

use super::RoiTool;
use crate::command::Command;
use crate::geometry::RectRoi;
use crate::renderer::Renderer;

/// Drawing surface size of the rectangle variant
pub const RECTANGLE_SURFACE_SIZE: Vec2 = Vec2::new(300.0, 300.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectangleDragState {
    #[default]
    Idle,
    Dragging {
        start: (i32, i32),
        current: (i32, i32),
    },
}

/// Single-rectangle ROI capture for one camera
#[derive(Debug, Clone)]
pub struct RectangleRoiTool {
    camera_id: String,
    state: RectangleDragState,
    /// What the overlay shows when no drag is in progress
    committed: Option<RectRoi>,
}

/// Whole-pixel position, truncated like the browser's `parseInt`
fn pixel(pos: Pos2) -> (i32, i32) {
    (pos.x as i32, pos.y as i32)
}

impl RectangleRoiTool {
    pub fn new(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            state: RectangleDragState::Idle,
            committed: None,
        }
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn state(&self) -> RectangleDragState {
        self.state
    }

    pub fn committed(&self) -> Option<RectRoi> {
        self.committed
    }

    /// The rectangle currently on the overlay: the live drag, else the committed one
    pub fn visible_rect(&self) -> Option<RectRoi> {
        match self.state {
            RectangleDragState::Dragging { start, current } => {
                Some(RectRoi::from_corners(start.0, start.1, current.0, current.1))
            }
            RectangleDragState::Idle => self.committed,
        }
    }

    /// Show the ROI stored on the server
    pub fn set_server_roi(&mut self, roi: RectRoi) {
        self.committed = Some(roi);
    }
}

impl RoiTool for RectangleRoiTool {
    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            RectangleDragState::Idle => "Idle",
            RectangleDragState::Dragging { .. } => "Dragging",
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2) -> Option<Command> {
        let start = pixel(pos);
        self.state = RectangleDragState::Dragging { start, current: start };
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> Option<Command> {
        if let RectangleDragState::Dragging { current, .. } = &mut self.state {
            *current = pixel(pos);
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2) -> Option<Command> {
        let RectangleDragState::Dragging { start, .. } = self.state else {
            return None;
        };
        let end = pixel(pos);
        self.state = RectangleDragState::Idle;

        let roi = RectRoi::from_corners(start.0, start.1, end.0, end.1);
        self.committed = Some(roi);
        Some(Command::SetRoi {
            camera_id: self.camera_id.clone(),
            roi,
        })
    }

    fn on_pointer_leave(&mut self, _last_pos: Pos2) -> Option<Command> {
        if matches!(self.state, RectangleDragState::Dragging { .. }) {
            debug!("{}: rectangle drag abandoned", self.camera_id);
            self.state = RectangleDragState::Idle;
        }
        None
    }

    fn clear(&mut self) {
        self.state = RectangleDragState::Idle;
        self.committed = None;
        info!("Cleared ROI for {}", self.camera_id);
    }

    fn draw(&self, renderer: &Renderer, painter: &Painter, surface: Rect) {
        if let Some(roi) = self.visible_rect() {
            renderer.render_rectangle(painter, surface, &roi);
        }
    }
}
