use std::rc::Rc;

use egui::Vec2;
use log::{info, warn};

use crate::element::{Element, PlotElement};
use crate::event::{EventBus, PlotEvent};
use crate::feature::PlotType;
use crate::geometry::Coordinate;
use crate::surface::{MapSurface, OverlayContent, OverlayId, OverlaySpec, VectorLayer};

const MARKER_OFFSET: Vec2 = Vec2::new(0.0, 25.0);
const SHAPE_OFFSET: Vec2 = Vec2::new(0.0, 16.0);

/// Delete button of the element at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAffordance {
    pub overlay: OverlayId,
    pub index: usize,
}

/// Shows one delete button per element and removes elements when pressed.
#[derive(Debug)]
pub struct Remove {
    bus: Rc<EventBus>,
    affordances: Vec<DeleteAffordance>,
}

impl Remove {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            affordances: Vec::new(),
        }
    }

    pub fn affordances(&self) -> &[DeleteAffordance] {
        &self.affordances
    }

    pub fn owns(&self, overlay: OverlayId) -> bool {
        self.affordances.iter().any(|a| a.overlay == overlay)
    }

    /// Create a delete button for every element of the collection.
    pub fn open(&mut self, elements: &[PlotElement], surface: &mut dyn MapSurface) {
        for (index, element) in elements.iter().enumerate() {
            let affordance = DeleteAffordance {
                overlay: OverlayId::new(),
                index,
            };
            surface.add_overlay(
                affordance.overlay,
                OverlaySpec {
                    position: delete_position(element),
                    offset: delete_offset(element.plot_type()),
                    content: OverlayContent::DeleteIcon { index },
                },
            );
            self.affordances.push(affordance);
        }
    }

    /// Tear every button down and lay them out again for `elements`.
    pub fn refresh(&mut self, elements: &[PlotElement], surface: &mut dyn MapSurface) {
        self.destroy(surface);
        self.open(elements, surface);
    }

    /// Delete the element whose button is `overlay`. Returns its former index.
    pub fn press(
        &mut self,
        overlay: OverlayId,
        elements: &mut Vec<PlotElement>,
        layer: &mut VectorLayer,
        surface: &mut dyn MapSurface,
    ) -> Option<usize> {
        let index = self.affordances.iter().find(|a| a.overlay == overlay)?.index;
        if index >= elements.len() {
            warn!("delete button {index} has no element, {} left", elements.len());
            self.refresh(elements, surface);
            return None;
        }

        let mut element = elements.remove(index);
        layer.remove_feature(element.id());
        element.destroy();
        info!("removed {} {} at {index}", element.plot_type(), element.id());

        self.bus.emit(&PlotEvent::Removed { index });
        self.refresh(elements, surface);
        Some(index)
    }

    pub fn destroy(&mut self, surface: &mut dyn MapSurface) {
        for affordance in self.affordances.drain(..) {
            surface.remove_overlay(affordance.overlay);
        }
    }
}

fn delete_offset(plot_type: PlotType) -> Vec2 {
    match plot_type {
        PlotType::Point | PlotType::Text => MARKER_OFFSET,
        _ => SHAPE_OFFSET,
    }
}

fn min_y(coordinates: impl IntoIterator<Item = Coordinate>) -> Option<f64> {
    coordinates.into_iter().map(|c| c.y).reduce(f64::min)
}

/// Where the delete button of `element` sits.
pub fn delete_position(element: &PlotElement) -> Coordinate {
    let center = element.center_point();
    let properties = &element.feature().properties;

    match element.plot_type() {
        PlotType::Line | PlotType::MeasureDistance => {
            let anchors = element.anchor_points();
            match (anchors.first(), anchors.last()) {
                (Some(first), Some(last)) if first.coordinate.y > last.coordinate.y => last.coordinate,
                (Some(first), _) => first.coordinate,
                _ => center,
            }
        }
        PlotType::Polygon | PlotType::MeasureArea => {
            match min_y(element.anchor_points().iter().map(|p| p.coordinate)) {
                Some(y) => Coordinate::new(center.x, y),
                None => center,
            }
        }
        PlotType::Rectangle => {
            let corners = properties.coordinates.iter().flatten().copied();
            match min_y(corners) {
                Some(y) => Coordinate::new(center.x, y),
                None => center,
            }
        }
        PlotType::Circle => center.offset(0.0, -properties.radius.unwrap_or(0.0)),
        PlotType::Ellipse => center.offset(0.0, -properties.minor_radius.unwrap_or(0.0)),
        PlotType::Point | PlotType::Text | PlotType::Arrow => center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory::{self, FactoryOptions};
    use crate::feature::{FeatureProperties, Geometry};

    #[test]
    fn line_button_sits_on_the_lower_end() {
        let path = vec![Coordinate::new(0.0, 5.0), Coordinate::new(10.0, 1.0)];
        let line = factory::create_element("LINE", Geometry::LineString(path), FeatureProperties::default(), &FactoryOptions::default())
            .unwrap();
        assert_eq!(delete_position(&line), Coordinate::new(10.0, 1.0));
    }

    #[test]
    fn circle_button_sits_below_the_center() {
        let properties = FeatureProperties {
            radius: Some(3.0),
            ..Default::default()
        };
        let circle = factory::create_element(
            "CIRCLE",
            Geometry::Point(Coordinate::new(1.0, 10.0)),
            properties,
            &FactoryOptions::default(),
        )
        .unwrap();
        assert_eq!(delete_position(&circle), Coordinate::new(1.0, 7.0));
    }
}
