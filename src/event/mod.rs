mod bus;
mod events;

pub use bus::{EventBus, EventRecorder};
pub use events::{DocumentEvent, EditorEvent};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent) + Send,
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
