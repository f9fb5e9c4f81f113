mod bus;
mod events;

pub use bus::EventBus;
pub use events::MaskEvent;

pub trait MaskEventHandler: Send {
    fn handle_event(&mut self, event: &MaskEvent);
}

impl<F> MaskEventHandler for F
where
    F: FnMut(&MaskEvent) + Send,
{
    fn handle_event(&mut self, event: &MaskEvent) {
        self(event)
    }
}
