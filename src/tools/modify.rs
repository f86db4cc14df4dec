use std::rc::Rc;

use egui::Vec2;
use log::debug;

use crate::element::{AnchorKind, Element, PlotElement};
use crate::event::{EventBus, PlotEvent};
use crate::feature::FeatureId;
use crate::geometry::Coordinate;
use crate::surface::{HandleKind, MapSurface, OverlayContent, OverlayId, OverlaySpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlHandle {
    pub overlay: OverlayId,
    pub kind: HandleKind,
    pub index: usize,
}

/// The control grabbed by the current press, cleared on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub kind: HandleKind,
    pub index: usize,
    pub start: Coordinate,
}

/// Reshapes and moves a single element through draggable control handles.
#[derive(Debug)]
pub struct Modify {
    bus: Rc<EventBus>,
    element: Option<FeatureId>,
    /// One handle per anchor point, in anchor order.
    anchors: Vec<ControlHandle>,
    center: Option<ControlHandle>,
    record: Option<PointRecord>,
}

fn handle_kind(kind: AnchorKind) -> HandleKind {
    match kind {
        AnchorKind::Anchor => HandleKind::Anchor,
        AnchorKind::Ghost => HandleKind::Ghost,
    }
}

impl Modify {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            element: None,
            anchors: Vec::new(),
            center: None,
            record: None,
        }
    }

    pub fn element_id(&self) -> Option<FeatureId> {
        self.element
    }

    pub fn handles(&self) -> impl Iterator<Item = &ControlHandle> {
        self.anchors.iter().chain(self.center.iter())
    }

    pub fn record(&self) -> Option<&PointRecord> {
        self.record.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.record.is_some()
    }

    /// Whether `overlay` is one of this engine's handles.
    pub fn owns(&self, overlay: OverlayId) -> bool {
        self.handles().any(|h| h.overlay == overlay)
    }

    /// Switch the element under modification. `None` tears the handles down.
    pub fn set_element(&mut self, element: Option<&PlotElement>, surface: &mut dyn MapSurface) {
        self.remove_control_points(surface);
        self.record = None;
        self.element = element.map(|e| e.id());

        if let Some(element) = element {
            self.add_control_points(element, surface);
        }
    }

    pub fn add_control_points(&mut self, element: &PlotElement, surface: &mut dyn MapSurface) {
        for (index, point) in element.anchor_points().iter().enumerate() {
            let handle = ControlHandle {
                overlay: OverlayId::new(),
                kind: handle_kind(point.kind),
                index,
            };
            surface.add_overlay(
                handle.overlay,
                OverlaySpec {
                    position: point.coordinate,
                    offset: Vec2::ZERO,
                    content: OverlayContent::Control {
                        kind: handle.kind,
                        index,
                    },
                },
            );
            self.anchors.push(handle);
        }

        let center = ControlHandle {
            overlay: OverlayId::new(),
            kind: HandleKind::Center,
            index: 0,
        };
        surface.add_overlay(
            center.overlay,
            OverlaySpec {
                position: element.center_point(),
                offset: Vec2::ZERO,
                content: OverlayContent::Control {
                    kind: HandleKind::Center,
                    index: 0,
                },
            },
        );
        self.center = Some(center);
    }

    pub fn remove_control_points(&mut self, surface: &mut dyn MapSurface) {
        for handle in self.anchors.drain(..).chain(self.center.take()) {
            surface.remove_overlay(handle.overlay);
        }
    }

    fn rebuild(&mut self, element: &PlotElement, surface: &mut dyn MapSurface) {
        self.remove_control_points(surface);
        self.add_control_points(element, surface);
    }

    /// Move handles to the element's current control points, rebuilding
    /// them when the anchor list no longer lines up with the handles.
    fn sync(&mut self, element: &PlotElement, surface: &mut dyn MapSurface) {
        let points = element.anchor_points();
        let aligned = points.len() == self.anchors.len()
            && points
                .iter()
                .zip(&self.anchors)
                .all(|(p, h)| handle_kind(p.kind) == h.kind);

        if !aligned {
            self.rebuild(element, surface);
            return;
        }

        for (point, handle) in points.iter().zip(&self.anchors) {
            surface.set_overlay_position(handle.overlay, point.coordinate);
        }
        if let Some(center) = self.center {
            surface.set_overlay_position(center.overlay, element.center_point());
        }
    }

    /// Grab the handle behind `overlay`. A ghost is promoted to an anchor
    /// right away.
    pub fn press(&mut self, overlay: OverlayId, element: &mut PlotElement, surface: &mut dyn MapSurface) -> bool {
        if self.element != Some(element.id()) {
            return false;
        }
        let Some(handle) = self.handles().find(|h| h.overlay == overlay).copied() else {
            return false;
        };

        let start = match handle.kind {
            HandleKind::Center => element.center_point(),
            _ => match element.anchor_points().get(handle.index) {
                Some(point) => point.coordinate,
                None => return false,
            },
        };

        if handle.kind == HandleKind::Ghost && element.promote_ghost(handle.index) {
            debug!("promoted ghost {} of {}", handle.index, element.id());
            self.sync(element, surface);
        }

        self.record = Some(PointRecord {
            kind: handle.kind,
            index: handle.index,
            start,
        });
        true
    }

    /// Drag the grabbed handle to `coordinate`.
    pub fn pointer_move(&mut self, coordinate: Coordinate, element: &mut PlotElement, surface: &mut dyn MapSurface) -> bool {
        let Some(record) = self.record else {
            return false;
        };
        if self.element != Some(element.id()) {
            return false;
        }

        match record.kind {
            HandleKind::Center => {
                let center = element.center_point();
                let (dx, dy) = (coordinate.x - center.x, coordinate.y - center.y);
                let anchors = element.anchor_points().iter().map(|p| p.translated(dx, dy)).collect();
                element.set_center_point(coordinate, Some(anchors));
            }
            kind => {
                let mut points = element.anchor_points().to_vec();
                let Some(point) = points.get_mut(record.index) else {
                    return false;
                };
                point.coordinate = coordinate;
                // A promoted ghost keeps its neighbours until release.
                element.set_anchor_points(points, kind == HandleKind::Anchor);
            }
        }

        self.sync(element, surface);
        true
    }

    /// Let go of the grabbed handle and publish `modified`.
    pub fn release(&mut self, element: &mut PlotElement, surface: &mut dyn MapSurface) -> bool {
        let Some(record) = self.record.take() else {
            return false;
        };
        if self.element != Some(element.id()) {
            return false;
        }

        if record.kind == HandleKind::Ghost {
            let points = element.anchor_points().to_vec();
            element.set_anchor_points(points, true);
            self.rebuild(element, surface);
        }

        self.bus.emit(&PlotEvent::Modified(&*element));
        true
    }

    pub fn destroy(&mut self, surface: &mut dyn MapSurface) {
        self.set_element(None, surface);
    }
}
