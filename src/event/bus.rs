use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::{error, warn};

use crate::event::{EventHandler, EventKind, ListenerResult, PlotEvent};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type SharedHandler = Rc<RefCell<Box<dyn EventHandler>>>;

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    handler: SharedHandler,
}

/// Synchronous publish/subscribe channel for plot events.
///
/// Listeners run in registration order. A listener that returns an error or
/// panics is logged and skipped; the rest still run. Listeners may
/// unsubscribe (themselves or others) while an event is being dispatched.
pub struct EventBus {
    handlers: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
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
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe a handler to one kind of event
    pub fn subscribe(&self, kind: EventKind, handler: Box<dyn EventHandler>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push(Subscription {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    /// Subscribe a closure to one kind of event
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&PlotEvent<'_>) -> ListenerResult + 'static,
    {
        self.subscribe(kind, Box::new(listener))
    }

    /// Returns false if the listener was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|s| s.id != id);
        handlers.len() != before
    }

    /// Drop every listener of `kind`, or every listener when `kind` is `None`.
    pub fn clear(&self, kind: Option<EventKind>) {
        let mut handlers = self.handlers.borrow_mut();
        match kind {
            Some(kind) => handlers.retain(|s| s.kind != kind),
            None => handlers.clear(),
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().iter().filter(|s| s.kind == kind).count()
    }

    fn is_subscribed(&self, id: ListenerId) -> bool {
        self.handlers.borrow().iter().any(|s| s.id == id)
    }

    /// Emit an event to all handlers registered for its kind
    pub fn emit(&self, event: &PlotEvent<'_>) {
        let kind = event.kind();
        let targets: Vec<(ListenerId, SharedHandler)> = self
            .handlers
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        for (id, handler) in targets {
            // Unsubscribed by an earlier listener during this dispatch.
            if !self.is_subscribed(id) {
                continue;
            }

            let Ok(mut handler) = handler.try_borrow_mut() else {
                warn!("listener {id:?} re-entered while handling {kind}, skipped");
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle_event(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!("error in {kind} listener: {err}"),
                Err(_) => error!("{kind} listener panicked"),
            }
        }
    }
}
