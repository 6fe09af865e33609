use egui::{Context, PointerButton, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the surface's top-left corner
    pub position: Pos2,
    /// Whether this position is within the surface bounds
    pub is_on_surface: bool,
}

/// Pointer events on one drawing surface, in surface-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// Pointer entered the surface
    PointerEnter {
        location: InputLocation,
    },
    /// Pointer left the surface
    PointerLeave {
        last_known_location: InputLocation,
    },
}

impl InputEvent {
    pub fn location(&self) -> InputLocation {
        match self {
            InputEvent::PointerDown { location, .. }
            | InputEvent::PointerUp { location, .. }
            | InputEvent::PointerMove { location, .. }
            | InputEvent::PointerEnter { location } => *location,
            InputEvent::PointerLeave { last_known_location } => *last_known_location,
        }
    }
}

/// The slice of egui's pointer state the handler reads each frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSnapshot {
    pub hover_pos: Option<Pos2>,
    pub pressed: Vec<PointerButton>,
    pub released: Vec<PointerButton>,
    pub down: Vec<PointerButton>,
}

const BUTTONS: [PointerButton; 3] = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle];

impl PointerSnapshot {
    pub fn from_egui(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            hover_pos: input.pointer.hover_pos(),
            pressed: BUTTONS.into_iter().filter(|b| input.pointer.button_pressed(*b)).collect(),
            released: BUTTONS.into_iter().filter(|b| input.pointer.button_released(*b)).collect(),
            down: BUTTONS.into_iter().filter(|b| input.pointer.button_down(*b)).collect(),
        })
    }
}

/// Converts raw egui pointer input into events local to one surface.
///
/// Call once per frame. At most one `PointerMove` is produced per call, so
/// whatever redraws in response to moves does so at most once per frame.
#[derive(Debug, Clone)]
pub struct InputHandler {
    surface_rect: Rect,
    last_pointer_pos: Option<Pos2>,
    on_surface: bool,
}

impl InputHandler {
    pub fn new(surface_rect: Rect) -> Self {
        Self {
            surface_rect,
            last_pointer_pos: None,
            on_surface: false,
        }
    }

    /// Update the surface's screen rectangle (it moves with scrolling and resizing)
    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = rect;
    }

    /// Creates an InputLocation from a screen position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: (pos - self.surface_rect.min).to_pos2(),
            is_on_surface: self.surface_rect.contains(pos),
        }
    }

    /// Process this frame's input for the widget behind `response`.
    ///
    /// The pointer only counts as present while egui reports the widget as
    /// hovered, so windows stacked above the surface swallow its input.
    pub fn process_response(&mut self, response: &egui::Response) -> Vec<InputEvent> {
        self.set_surface_rect(response.rect);
        let mut pointer = PointerSnapshot::from_egui(&response.ctx);
        pointer.hover_pos = response.hover_pos();
        self.process_pointer(&pointer)
    }

    pub fn process_pointer(&mut self, pointer: &PointerSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();

        match pointer.hover_pos {
            Some(pos) => {
                let location = self.make_location(pos);
                if location.is_on_surface && !self.on_surface {
                    events.push(InputEvent::PointerEnter { location });
                } else if !location.is_on_surface && self.on_surface {
                    if let Some(last) = self.last_pointer_pos {
                        events.push(InputEvent::PointerLeave {
                            last_known_location: self.make_location(last),
                        });
                    }
                }

                if location.is_on_surface && Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        location,
                        held_buttons: pointer.down.clone(),
                    });
                }

                self.on_surface = location.is_on_surface;
                self.last_pointer_pos = Some(pos);
            }
            None => {
                if self.on_surface {
                    if let Some(last) = self.last_pointer_pos {
                        events.push(InputEvent::PointerLeave {
                            last_known_location: self.make_location(last),
                        });
                    }
                }
                self.on_surface = false;
            }
        }

        // Presses and releases are reported where the pointer is (or last was)
        let button_pos = pointer.hover_pos.or(self.last_pointer_pos);
        if pointer.hover_pos.is_none() {
            self.last_pointer_pos = None;
        }
        let Some(location) = button_pos.map(|pos| self.make_location(pos)) else {
            return events;
        };
        if location.is_on_surface {
            for button in &pointer.pressed {
                events.push(InputEvent::PointerDown { location, button: *button });
            }
            for button in &pointer.released {
                events.push(InputEvent::PointerUp { location, button: *button });
            }
        }

        events
    }
}
