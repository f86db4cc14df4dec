use std::rc::Rc;

use futures::channel::mpsc::UnboundedSender;
use log::{debug, info, warn};

use crate::element::{AnchorAttr, AnchorPoint, Element, PlotElement};
use crate::event::{EventBus, PlotEvent};
use crate::feature::{FeatureId, PlotType};
use crate::geometry::Coordinate;
use crate::surface::VectorLayer;

/// Work the draw engine hands back to the plot, to run once the current
/// input event has been fully dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    CloseDraw(FeatureId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing { element: FeatureId, plot_type: PlotType },
}

/// Builds one element from a sequence of clicks.
pub struct Draw {
    state: DrawState,
    coordinates: Vec<Coordinate>,
    bus: Rc<EventBus>,
    deferred: UnboundedSender<DeferredTask>,
}

impl std::fmt::Debug for Draw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Draw")
            .field("state", &self.state)
            .field("coordinates", &self.coordinates)
            .finish_non_exhaustive()
    }
}

impl Draw {
    pub fn new(bus: Rc<EventBus>, deferred: UnboundedSender<DeferredTask>) -> Self {
        Self {
            state: DrawState::Idle,
            coordinates: Vec::new(),
            bus,
            deferred,
        }
    }

    pub fn open(&mut self, element: &PlotElement) {
        info!("drawing {} {}", element.plot_type(), element.id());
        self.state = DrawState::Drawing {
            element: element.id(),
            plot_type: element.plot_type(),
        };
        self.coordinates.clear();
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// Id of the element being drawn.
    pub fn element_id(&self) -> Option<FeatureId> {
        match self.state {
            DrawState::Drawing { element, .. } => Some(element),
            DrawState::Idle => None,
        }
    }

    /// Clicks recorded so far.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// The plot type being drawn, if `element` is the element being drawn.
    fn drawing(&self, element: &PlotElement) -> Option<PlotType> {
        match self.state {
            DrawState::Drawing { element: id, plot_type } if id == element.id() => Some(plot_type),
            _ => None,
        }
    }

    pub fn handle_click(&mut self, element: &mut PlotElement, layer: &mut VectorLayer, coordinate: Coordinate) {
        let Some(plot_type) = self.drawing(element) else {
            return;
        };

        if layer.add_feature(element.id()) {
            debug!("attached {} to the layer", element.id());
        }
        self.coordinates.push(coordinate);
        let clicks = self.coordinates.len();

        match plot_type {
            PlotType::Point | PlotType::Text => {
                element.set_center_point(coordinate, None);
                self.defer_close(element.id());
            }
            PlotType::Line | PlotType::Polygon | PlotType::MeasureArea | PlotType::MeasureDistance => {
                // The trailing vertex follows the pointer until the next click.
                let mut anchors = anchors_from(&self.coordinates);
                anchors.push(AnchorPoint::anchor(coordinate));
                element.set_anchor_points(anchors, true);
            }
            PlotType::Circle | PlotType::Ellipse if clicks == 1 => {
                element.set_center_point(coordinate, None);
            }
            PlotType::Circle => {
                self.update_points(element, plot_type, &self.coordinates);
                self.defer_close(element.id());
            }
            PlotType::Ellipse => {
                self.close(Some(&*element));
            }
            PlotType::Arrow | PlotType::Rectangle => {
                self.update_points(element, plot_type, &self.coordinates);
                if clicks > 1 {
                    self.defer_close(element.id());
                }
            }
        }
    }

    /// Rubber-band preview from the recorded clicks plus the pointer.
    pub fn handle_pointer_move(&mut self, element: &mut PlotElement, coordinate: Coordinate) {
        let Some(plot_type) = self.drawing(element) else {
            return;
        };
        if self.coordinates.is_empty() {
            return;
        }

        let mut preview = self.coordinates.clone();
        preview.push(coordinate);
        self.update_points(element, plot_type, &preview);
    }

    /// A double click arrives after the two clicks it is made of, so the
    /// duplicate last coordinate is dropped before committing.
    pub fn handle_double_click(&mut self, element: &mut PlotElement) -> bool {
        if self.drawing(element).is_none() {
            return false;
        }

        self.coordinates.pop();
        element.set_anchor_points(anchors_from(&self.coordinates), true);
        self.close(Some(&*element));
        true
    }

    /// Finish with the clicks recorded so far. Returns true so the host can
    /// suppress its own context menu.
    pub fn handle_context_menu(&mut self, element: &mut PlotElement) -> bool {
        if self.drawing(element).is_none() {
            return false;
        }

        element.set_anchor_points(anchors_from(&self.coordinates), true);
        self.close(Some(&*element));
        true
    }

    /// Back to idle. When `finished` is given, `drawend` is published for it.
    pub fn close(&mut self, finished: Option<&PlotElement>) {
        if let Some(element) = finished {
            info!("draw end {} {}", element.plot_type(), element.id());
            self.bus.emit(&PlotEvent::DrawEnd(element));
        }

        self.state = DrawState::Idle;
        self.coordinates.clear();
    }

    pub fn destroy(&mut self) {
        self.state = DrawState::Idle;
        self.coordinates.clear();
    }

    fn defer_close(&self, element: FeatureId) {
        if self.deferred.unbounded_send(DeferredTask::CloseDraw(element)).is_err() {
            warn!("deferred queue closed, {element} stays open");
        }
    }

    fn update_points(&self, element: &mut PlotElement, plot_type: PlotType, coordinates: &[Coordinate]) {
        let anchors = match plot_type {
            PlotType::Ellipse => {
                let [center, corner, ..] = coordinates else {
                    return;
                };
                vec![
                    AnchorPoint::anchor(Coordinate::new(corner.x, center.y)).with_attr(AnchorAttr::Major),
                    AnchorPoint::anchor(Coordinate::new(center.x, corner.y)).with_attr(AnchorAttr::Minor),
                ]
            }
            PlotType::Circle => match coordinates.get(1) {
                Some(&edge) => vec![AnchorPoint::anchor(edge)],
                None => return,
            },
            PlotType::Point | PlotType::Text => return,
            _ => anchors_from(coordinates),
        };

        element.set_anchor_points(anchors, true);
    }
}

fn anchors_from(coordinates: &[Coordinate]) -> Vec<AnchorPoint> {
    coordinates.iter().copied().map(AnchorPoint::anchor).collect()
}
