#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use map_plot::surface::{Cursor, HandleKind, OverlayContent, OverlayId, OverlaySpec};
use map_plot::{Coordinate, EventKind, MapSurface, Plot, PlotOptions};

/// Map stand-in that keeps every overlay it is handed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub overlays: HashMap<OverlayId, OverlaySpec>,
    pub cursor: Cursor,
}

impl RecordingSurface {
    /// Overlay of the control handle `kind` at `index`.
    pub fn control(&self, kind: HandleKind, index: usize) -> Option<OverlayId> {
        self.overlays.iter().find_map(|(id, spec)| match spec.content {
            OverlayContent::Control { kind: k, index: i } if k == kind && i == index => Some(*id),
            _ => None,
        })
    }

    pub fn delete_icon(&self, index: usize) -> Option<OverlayId> {
        self.overlays.iter().find_map(|(id, spec)| match spec.content {
            OverlayContent::DeleteIcon { index: i } if i == index => Some(*id),
            _ => None,
        })
    }

    pub fn count(&self, kind: HandleKind) -> usize {
        self.overlays
            .values()
            .filter(|spec| matches!(spec.content, OverlayContent::Control { kind: k, .. } if k == kind))
            .count()
    }
}

impl MapSurface for RecordingSurface {
    fn add_overlay(&mut self, id: OverlayId, overlay: OverlaySpec) {
        self.overlays.insert(id, overlay);
    }

    fn set_overlay_position(&mut self, id: OverlayId, position: Coordinate) {
        if let Some(spec) = self.overlays.get_mut(&id) {
            spec.position = position;
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn hit_tolerance(&self) -> f64 {
        0.5
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

pub fn edit_plot() -> Plot<RecordingSurface> {
    Plot::new(RecordingSurface::default(), PlotOptions::edit())
}

pub fn view_plot() -> Plot<RecordingSurface> {
    Plot::new(RecordingSurface::default(), PlotOptions::default())
}

pub fn c(x: f64, y: f64) -> Coordinate {
    Coordinate::new(x, y)
}

/// Log of `kind` events in the order they were published, with the id of
/// the element they carried.
pub type EventLog = Rc<RefCell<Vec<(EventKind, Option<map_plot::FeatureId>)>>>;

pub fn record(plot: &Plot<RecordingSurface>, kinds: &[EventKind]) -> EventLog {
    let log: EventLog = Rc::default();
    for &kind in kinds {
        let log = Rc::clone(&log);
        plot.on(kind, move |event| {
            log.borrow_mut().push((event.kind(), event.element_id()));
            Ok(())
        });
    }
    log
}

pub fn all_events(plot: &Plot<RecordingSurface>) -> EventLog {
    record(
        plot,
        &[
            EventKind::DrawEnd,
            EventKind::Modified,
            EventKind::Removed,
            EventKind::Selected,
            EventKind::Clear,
        ],
    )
}
