mod bus;
mod events;

pub use bus::{EventBus, ListenerId};
pub use events::{EventKind, PlotEvent};

use thiserror::Error;

/// Error a listener reports back to the bus. The bus logs it and carries on
/// with the remaining listeners.
#[derive(Debug, Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ListenerResult = Result<(), ListenerError>;

pub trait EventHandler {
    fn handle_event(&mut self, event: &PlotEvent<'_>) -> ListenerResult;
}

impl<F> EventHandler for F
where
    F: FnMut(&PlotEvent<'_>) -> ListenerResult,
{
    fn handle_event(&mut self, event: &PlotEvent<'_>) -> ListenerResult {
        self(event)
    }
}
