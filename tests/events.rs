use std::cell::{Cell, RefCell};
use std::rc::Rc;

use map_plot::event::ListenerError;
use map_plot::{EventBus, EventKind, PlotEvent};

#[test]
fn failing_listeners_do_not_stop_dispatch() {
    let bus = EventBus::new();
    let reached = Rc::new(Cell::new(0));

    bus.on(EventKind::Clear, |_| Err(ListenerError::new("disk full")));
    bus.on(EventKind::Clear, |_| panic!("listener bug"));
    let counter = Rc::clone(&reached);
    bus.on(EventKind::Clear, move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    bus.emit(&PlotEvent::Clear);
    bus.emit(&PlotEvent::Clear);

    assert_eq!(reached.get(), 2);
}

#[test]
fn only_matching_kind_is_called() {
    let bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for kind in [EventKind::Clear, EventKind::Removed] {
        let seen = Rc::clone(&seen);
        bus.on(kind, move |event| {
            seen.borrow_mut().push(event.kind());
            Ok(())
        });
    }

    bus.emit(&PlotEvent::Removed { index: 3 });
    assert_eq!(seen.borrow().as_slice(), &[EventKind::Removed]);
}

#[test]
fn listener_can_unsubscribe_a_later_one() {
    let bus = Rc::new(EventBus::new());
    let later_calls = Rc::new(Cell::new(0));
    let later_id = Rc::new(Cell::new(None));

    let remover_bus = Rc::clone(&bus);
    let target = Rc::clone(&later_id);
    bus.on(EventKind::Clear, move |_| {
        if let Some(id) = target.get() {
            remover_bus.unsubscribe(id);
        }
        Ok(())
    });
    let calls = Rc::clone(&later_calls);
    later_id.set(Some(bus.on(EventKind::Clear, move |_| {
        calls.set(calls.get() + 1);
        Ok(())
    })));

    bus.emit(&PlotEvent::Clear);

    assert_eq!(later_calls.get(), 0);
    assert_eq!(bus.listener_count(EventKind::Clear), 1);
}

#[test]
fn listener_can_unsubscribe_itself() {
    let bus = Rc::new(EventBus::new());
    let calls = Rc::new(Cell::new(0));
    let own_id = Rc::new(Cell::new(None));

    let handle = Rc::clone(&bus);
    let id_slot = Rc::clone(&own_id);
    let counter = Rc::clone(&calls);
    own_id.set(Some(bus.on(EventKind::Clear, move |_| {
        counter.set(counter.get() + 1);
        if let Some(id) = id_slot.get() {
            handle.unsubscribe(id);
        }
        Ok(())
    })));

    bus.emit(&PlotEvent::Clear);
    bus.emit(&PlotEvent::Clear);

    assert_eq!(calls.get(), 1);
    assert_eq!(bus.listener_count(EventKind::Clear), 0);
}

#[test]
fn unsubscribe_reports_unknown_ids() {
    let bus = EventBus::new();
    let id = bus.on(EventKind::Selected, |_| Ok(()));

    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
}

#[test]
fn clearing_by_kind_keeps_the_rest() {
    let bus = EventBus::new();
    bus.on(EventKind::Selected, |_| Ok(()));
    bus.on(EventKind::Modified, |_| Ok(()));

    bus.clear(Some(EventKind::Selected));
    assert_eq!(bus.listener_count(EventKind::Selected), 0);
    assert_eq!(bus.listener_count(EventKind::Modified), 1);

    bus.clear(None);
    assert_eq!(bus.listener_count(EventKind::Modified), 0);
}
