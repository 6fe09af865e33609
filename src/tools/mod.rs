use egui::{Painter, PointerButton, Pos2, Rect};

use crate::command::Command;
use crate::input::InputEvent;
use crate::renderer::Renderer;

/// Tool trait defines the interface for the ROI capture tools.
///
/// Handlers receive surface-local positions and return a [`Command`] when
/// the interaction produces something the server must be told about.
pub trait RoiTool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Name of the tool's current state, for display
    fn current_state_name(&self) -> &'static str;

    /// Handle a primary button press on the surface
    fn on_pointer_down(&mut self, pos: Pos2) -> Option<Command>;

    /// Handle pointer movement over the surface
    fn on_pointer_move(&mut self, pos: Pos2) -> Option<Command>;

    /// Handle a primary button release on the surface
    fn on_pointer_up(&mut self, pos: Pos2) -> Option<Command>;

    /// Handle the pointer leaving the surface
    fn on_pointer_leave(&mut self, last_pos: Pos2) -> Option<Command>;

    /// Remove everything drawn and return to the initial state
    fn clear(&mut self);

    /// Paint the tool's shapes onto the surface
    fn draw(&self, renderer: &Renderer, painter: &Painter, surface: Rect);

    /// Route a surface event to the matching handler
    fn handle_event(&mut self, event: &InputEvent) -> Option<Command> {
        match event {
            InputEvent::PointerDown { location, button: PointerButton::Primary } => {
                self.on_pointer_down(location.position)
            }
            InputEvent::PointerUp { location, button: PointerButton::Primary } => {
                self.on_pointer_up(location.position)
            }
            InputEvent::PointerMove { location, .. } => self.on_pointer_move(location.position),
            InputEvent::PointerLeave { last_known_location } => {
                self.on_pointer_leave(last_known_location.position)
            }
            _ => None,
        }
    }
}

mod polygon_tool;
mod rectangle_tool;

pub use polygon_tool::{PolygonRoiTool, POLYGON_SURFACE_SIZE};
pub use rectangle_tool::{RectangleDragState, RectangleRoiTool, RECTANGLE_SURFACE_SIZE};
