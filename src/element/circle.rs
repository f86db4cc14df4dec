use crate::element::common::translate_anchors;
use crate::element::point::single_coordinate;
use crate::element::{AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::{self, Coordinate};

/// Circle edited through a single anchor on its circumference.
#[derive(Debug, Clone)]
pub struct CircleElement {
    base: ElementBase,
}

impl CircleElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        if !matches!(feature.geometry, Geometry::Circle { .. }) {
            feature.geometry = Geometry::Circle {
                center: single_coordinate(&feature.geometry),
                radius: feature.properties.radius.unwrap_or(0.0),
            };
        }

        let mut circle = Self {
            base: ElementBase::new(feature),
        };
        circle.init_control_points();
        circle
    }

    pub fn radius(&self) -> f64 {
        match self.base.feature.geometry {
            Geometry::Circle { radius, .. } => radius,
            _ => 0.0,
        }
    }

    fn center(&self) -> Coordinate {
        match self.base.feature.geometry {
            Geometry::Circle { center, .. } => center,
            _ => self.base.center_point,
        }
    }
}

impl Element for CircleElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        let center = self.center();
        let radius = self.base.feature.properties.radius.unwrap_or(self.radius());
        self.base.center_point = center;
        self.base.anchor_points = vec![AnchorPoint::anchor(center.offset(radius, 0.0))];
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, _update_ghost: bool) {
        let Some(edge) = points.first() else {
            return;
        };

        let center = self.base.center_point;
        let radius = geometry::distance(center, edge.coordinate);
        self.base.feature.properties.radius = Some(radius);
        self.base.feature.geometry = Geometry::Circle { center, radius };
        self.base.anchor_points = points;
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        let anchors = anchors.unwrap_or_else(|| {
            let (dx, dy) = self.base.delta_to(center);
            translate_anchors(&self.base.anchor_points, dx, dy)
        });
        self.base.feature.geometry = Geometry::Circle {
            center,
            radius: self.radius(),
        };
        self.base.anchor_points = anchors;
        self.base.center_point = center;
    }
}
