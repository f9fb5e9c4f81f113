use egui::{Context, Pos2, Rect, TouchId, TouchPhase};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

impl InputLocation {
    pub fn new(position: Pos2, canvas_rect: Rect) -> Self {
        Self {
            position,
            is_in_canvas: canvas_rect.contains(position),
        }
    }
}

/// Pointer and touch input relevant to the mask canvas
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { location: InputLocation },
    /// Pointer moved over the canvas
    PointerMove { location: InputLocation },
    /// Primary button was released
    PointerUp { location: InputLocation },
    /// Pointer left the canvas
    PointerLeave { last_known_location: InputLocation },
    TouchStart { location: InputLocation },
    TouchMove { location: InputLocation },
    /// Touch lifted or was cancelled
    TouchEnd { location: InputLocation },
}

impl InputEvent {
    pub fn location(&self) -> InputLocation {
        match self {
            InputEvent::PointerDown { location }
            | InputEvent::PointerMove { location }
            | InputEvent::PointerUp { location }
            | InputEvent::TouchStart { location }
            | InputEvent::TouchMove { location }
            | InputEvent::TouchEnd { location } => *location,
            InputEvent::PointerLeave { last_known_location } => *last_known_location,
        }
    }
}

/// Handles converting raw egui input into canvas [`InputEvent`]s.
///
/// Keeps just enough state between frames to notice moves and leaves, and
/// which finger is drawing.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_in_canvas: bool,
    active_touch: Option<TouchId>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything seen so far, e.g. when a new image is shown
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Process raw egui input for this frame
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let mut saw_touch = false;
            for event in &input.events {
                if let egui::Event::Touch { id, phase, pos, .. } = event {
                    saw_touch = true;
                    events.extend(self.process_touch(*id, *phase, *pos, canvas_rect));
                }
            }

            // egui also reports touches as a simulated pointer
            if saw_touch {
                return;
            }

            let hover = input.pointer.hover_pos();

            if input.pointer.primary_pressed() {
                if let Some(pos) = input.pointer.interact_pos() {
                    events.push(InputEvent::PointerDown {
                        location: InputLocation::new(pos, canvas_rect),
                    });
                }
            }

            if let Some(pos) = hover {
                if Some(pos) != self.last_pointer_pos && canvas_rect.contains(pos) {
                    events.push(InputEvent::PointerMove {
                        location: InputLocation::new(pos, canvas_rect),
                    });
                }
            }

            if input.pointer.primary_released() {
                if let Some(pos) = hover.or(self.last_pointer_pos) {
                    events.push(InputEvent::PointerUp {
                        location: InputLocation::new(pos, canvas_rect),
                    });
                }
            }

            let in_canvas = hover.is_some_and(|pos| canvas_rect.contains(pos));
            if self.was_in_canvas && !in_canvas {
                if let Some(pos) = hover.or(self.last_pointer_pos) {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: InputLocation::new(pos, canvas_rect),
                    });
                }
            }

            self.was_in_canvas = in_canvas;
            self.last_pointer_pos = hover;
        });

        events
    }

    /// Translate one touch event.
    ///
    /// Only the finger that touched first is followed; other fingers are
    /// ignored until it lifts.
    pub fn process_touch(
        &mut self,
        id: TouchId,
        phase: TouchPhase,
        pos: Pos2,
        canvas_rect: Rect,
    ) -> Option<InputEvent> {
        let location = InputLocation::new(pos, canvas_rect);
        match phase {
            TouchPhase::Start => {
                if self.active_touch.is_some() {
                    return None;
                }
                self.active_touch = Some(id);
                Some(InputEvent::TouchStart { location })
            }
            TouchPhase::Move => {
                (self.active_touch == Some(id)).then_some(InputEvent::TouchMove { location })
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if self.active_touch != Some(id) {
                    return None;
                }
                self.active_touch = None;
                Some(InputEvent::TouchEnd { location })
            }
        }
    }
}
