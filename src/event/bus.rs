use parking_lot::Mutex;

use crate::event::{MaskEvent, MaskEventHandler};

/// A simple event bus for broadcasting mask events to registered handlers
pub struct EventBus {
    handlers: Mutex<Vec<Box<dyn MaskEventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.lock().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn MaskEventHandler>) {
        self.handlers.lock().push(handler);
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: MaskEvent) {
        log::trace!("Emitting {:?}", event);
        for handler in self.handlers.lock().iter_mut() {
            handler.handle_event(&event);
        }
    }
}
