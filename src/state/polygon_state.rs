/// The state machine behind polygon ROI capture.
///
/// Only one of drawing, dragging or closed can hold at a time, and every
/// change of variant goes through [`PolygonState::transition_to`].
///
/// # State Transitions
///
/// ```text
///   ┌─────────┐  place vertex   ┌─────────┐  click handle   ┌──────────┐
///   │  Empty  ├────────────────►│ Drawing ├────────────────►│  Closed  │
///   └────▲────┘                 └────┬────┘                 └──┬───▲───┘
///        │          clear            │                         │   │ drag
///        ◄───────────────────────────┘                         │   │ handle
///        │                                                     ◄───┘
///        │                        clear                        │
///        ◄─────────────────────────────────────────────────────┘
/// ```
use crate::error::TransitionError;
use crate::geometry::{Polygon, Vertex, VertexId};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PolygonState {
    /// Nothing drawn yet, or cleared
    #[default]
    Empty,
    /// Vertices are being placed; the polygon is still open
    Drawing {
        vertices: Vec<Vertex>,
    },
    /// The polygon is closed; `dragging` names the handle being moved, if any
    Closed {
        polygon: Polygon,
        dragging: Option<VertexId>,
    },
}

impl PolygonState {
    pub fn name(&self) -> &'static str {
        match self {
            PolygonState::Empty => "Empty",
            PolygonState::Drawing { .. } => "Drawing",
            PolygonState::Closed { dragging: Some(_), .. } => "Dragging",
            PolygonState::Closed { .. } => "Closed",
        }
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &PolygonState) -> bool {
        match (self, new_state) {
            // Clearing is always allowed
            (_, PolygonState::Empty) => true,

            (PolygonState::Empty, PolygonState::Drawing { .. }) => true,
            (PolygonState::Drawing { .. }, PolygonState::Drawing { .. }) => true,
            (PolygonState::Drawing { .. }, PolygonState::Closed { .. }) => true,

            // Handle drags keep the polygon closed
            (PolygonState::Closed { .. }, PolygonState::Closed { .. }) => true,

            _ => false,
        }
    }

    /// Replace the current state, rejecting transitions the machine does not allow
    pub fn transition_to(&mut self, new_state: PolygonState) -> Result<(), TransitionError> {
        if !self.can_transition_to(&new_state) {
            return Err(TransitionError::InvalidStateTransition {
                from: self.name(),
                to: new_state.name(),
            });
        }

        if self.name() != new_state.name() {
            log::debug!("Polygon state {} -> {}", self.name(), new_state.name());
        }
        *self = new_state;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PolygonState::Empty)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, PolygonState::Drawing { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PolygonState::Closed { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PolygonState::Closed { dragging: Some(_), .. })
    }

    /// Vertices that currently have handles, in placement order
    pub fn vertices(&self) -> &[Vertex] {
        match self {
            PolygonState::Empty => &[],
            PolygonState::Drawing { vertices } => vertices,
            PolygonState::Closed { polygon, .. } => polygon.vertices(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    fn drawing() -> PolygonState {
        PolygonState::Drawing {
            vertices: vec![Vertex::new(Pos2::new(1.0, 1.0))],
        }
    }

    fn closed() -> PolygonState {
        PolygonState::Closed {
            polygon: Polygon::default(),
            dragging: None,
        }
    }

    #[test]
    fn test_valid_transitions() {
        let mut state = PolygonState::Empty;
        assert!(state.transition_to(drawing()).is_ok());
        assert!(state.is_drawing());
        assert!(state.transition_to(closed()).is_ok());
        assert!(state.is_closed());
        assert!(state.transition_to(PolygonState::Empty).is_ok());
        assert!(state.is_empty());
    }

    #[test]
    fn test_closed_cannot_resume_drawing() {
        let mut state = closed();
        let err = state.transition_to(drawing()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidStateTransition { from: "Closed", to: "Drawing" }
        );
        assert!(state.is_closed());
    }

    #[test]
    fn test_empty_cannot_close() {
        let mut state = PolygonState::Empty;
        assert!(state.transition_to(closed()).is_err());
        assert!(state.is_empty());
    }

    #[test]
    fn test_never_drawing_and_closed() {
        for state in [PolygonState::Empty, drawing(), closed()] {
            assert!(!(state.is_drawing() && state.is_closed()));
        }
    }
}
