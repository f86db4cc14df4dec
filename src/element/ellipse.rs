use crate::element::common::translate_anchors;
use crate::element::point::single_coordinate;
use crate::element::{AnchorAttr, AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::{self, Coordinate};

/// Axis-aligned ellipse, stored as a polygon approximation. The major
/// anchor sits on the horizontal axis and the minor anchor on the vertical
/// one.
#[derive(Debug, Clone)]
pub struct EllipseElement {
    base: ElementBase,
}

impl EllipseElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        let properties = &mut feature.properties;
        let center = properties
            .center
            .unwrap_or_else(|| single_coordinate(&feature.geometry));
        let major = properties.major_radius.unwrap_or(0.0);
        let minor = properties.minor_radius.unwrap_or(1.0);

        properties.center = Some(center);
        properties.major_radius = Some(major);
        properties.minor_radius = Some(minor);

        if !matches!(feature.geometry, Geometry::Polygon(_)) {
            feature.geometry = Geometry::Polygon(vec![geometry::ellipse_ring(center, major, minor)]);
        }

        let mut ellipse = Self {
            base: ElementBase::new(feature),
        };
        ellipse.init_control_points();
        ellipse
    }

    pub fn major_radius(&self) -> f64 {
        self.base.feature.properties.major_radius.unwrap_or(0.0)
    }

    pub fn minor_radius(&self) -> f64 {
        self.base.feature.properties.minor_radius.unwrap_or(1.0)
    }
}

impl Element for EllipseElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        let center = self.base.feature.properties.center.unwrap_or_default();
        self.base.center_point = center;
        self.base.anchor_points = vec![
            AnchorPoint::anchor(center.offset(self.major_radius(), 0.0)).with_attr(AnchorAttr::Major),
            AnchorPoint::anchor(center.offset(0.0, self.minor_radius())).with_attr(AnchorAttr::Minor),
        ];
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, _update_ghost: bool) {
        let tagged = |attr| points.iter().find(|p| p.attr == Some(attr));
        let (Some(major), Some(minor)) = (
            tagged(AnchorAttr::Major).or(points.first()),
            tagged(AnchorAttr::Minor).or(points.get(1)),
        ) else {
            return;
        };

        let center = self.base.center_point;
        let major = Coordinate::new(major.coordinate.x, center.y);
        let minor = Coordinate::new(center.x, minor.coordinate.y);
        let major_radius = geometry::distance(center, major);
        let minor_radius = geometry::distance(center, minor);

        let properties = &mut self.base.feature.properties;
        properties.center = Some(center);
        properties.major_radius = Some(major_radius);
        properties.minor_radius = Some(minor_radius);

        self.base.feature.geometry =
            Geometry::Polygon(vec![geometry::ellipse_ring(center, major_radius, minor_radius)]);
        self.base.anchor_points = vec![
            AnchorPoint::anchor(major).with_attr(AnchorAttr::Major),
            AnchorPoint::anchor(minor).with_attr(AnchorAttr::Minor),
        ];
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        let (dx, dy) = self.base.delta_to(center);
        let anchors = anchors.unwrap_or_else(|| translate_anchors(&self.base.anchor_points, dx, dy));

        self.base.feature.geometry.translate(dx, dy);
        self.base.feature.properties.center = Some(center);
        self.base.anchor_points = anchors;
        self.base.center_point = center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::PlotType;

    #[test]
    fn anchors_are_projected_onto_their_axes() {
        let mut ellipse = EllipseElement::new(Feature::empty(PlotType::Ellipse));
        ellipse.set_center_point(Coordinate::new(10.0, 10.0), None);
        ellipse.set_anchor_points(
            vec![
                AnchorPoint::anchor(Coordinate::new(14.0, 12.0)).with_attr(AnchorAttr::Major),
                AnchorPoint::anchor(Coordinate::new(7.0, 12.0)).with_attr(AnchorAttr::Minor),
            ],
            true,
        );

        assert_eq!(ellipse.major_radius(), 4.0);
        assert_eq!(ellipse.minor_radius(), 2.0);
        assert_eq!(ellipse.anchor_points()[0].coordinate, Coordinate::new(14.0, 10.0));
        assert_eq!(ellipse.anchor_points()[1].coordinate, Coordinate::new(10.0, 12.0));
        assert_eq!(ellipse.geometry().coordinates().len(), geometry::ELLIPSE_SIDES + 1);
    }

    #[test]
    fn single_anchor_is_ignored() {
        let mut ellipse = EllipseElement::new(Feature::empty(PlotType::Ellipse));
        let before = ellipse.anchor_points().to_vec();
        ellipse.set_anchor_points(vec![AnchorPoint::anchor(Coordinate::new(5.0, 5.0))], true);
        assert_eq!(ellipse.anchor_points(), before.as_slice());
    }
}
