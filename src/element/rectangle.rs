use crate::element::common::translate_anchors;
use crate::element::{AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::{self, Coordinate};

/// Axis-aligned rectangle spanned by two opposite corners.
#[derive(Debug, Clone)]
pub struct RectangleElement {
    base: ElementBase,
}

impl RectangleElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        let span = feature.properties.coordinates.as_deref().and_then(|coordinates| {
            let first = *coordinates.first()?;
            Some((first, coordinates.get(1).copied().unwrap_or(first)))
        });

        if let Some((first, second)) = span {
            feature.geometry = Geometry::Polygon(vec![geometry::rectangle_corners(first, second).to_vec()]);
        } else if !matches!(feature.geometry, Geometry::Polygon(_)) {
            feature.geometry = Geometry::Polygon(Vec::new());
        }

        let mut rectangle = Self {
            base: ElementBase::new(feature),
        };
        rectangle.init_control_points();
        rectangle
    }

    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> &[Coordinate] {
        match &self.base.feature.geometry {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice).unwrap_or_default(),
            _ => &[],
        }
    }
}

impl Element for RectangleElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        let corners = self.base.feature.properties.coordinates.clone().unwrap_or_default();
        self.base.anchor_points = corners.into_iter().map(AnchorPoint::anchor).collect();
        self.base.center_point = geometry::extent_center(self.corners());
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, _update_ghost: bool) {
        let mut coordinates: Vec<Coordinate> = points.iter().map(|p| p.coordinate).collect();
        let Some(&first) = coordinates.first() else {
            return;
        };
        if coordinates.len() < 2 {
            coordinates.push(first);
        }

        let corners = geometry::rectangle_corners(coordinates[0], coordinates[1]);
        self.base.center_point = geometry::extent_center(&corners);
        self.base.feature.geometry = Geometry::Polygon(vec![corners.to_vec()]);
        self.base.anchor_points = coordinates.iter().copied().map(AnchorPoint::anchor).collect();
        self.base.feature.properties.coordinates = Some(coordinates);
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        let (dx, dy) = self.base.delta_to(center);
        let anchors = anchors.unwrap_or_else(|| translate_anchors(&self.base.anchor_points, dx, dy));

        self.base.feature.geometry.translate(dx, dy);
        self.base.feature.properties.coordinates = Some(anchors.iter().map(|p| p.coordinate).collect());
        self.base.anchor_points = anchors;
        self.base.center_point = center;
    }
}
