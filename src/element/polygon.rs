use crate::element::common::{anchor_coordinates, path_anchors, translate_anchors};
use crate::element::{AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::{self, Coordinate};

/// Closed polygon. Only the outer ring is editable.
#[derive(Debug, Clone)]
pub struct PolygonElement {
    base: ElementBase,
}

impl PolygonElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        // A line string (older MEASURE_AREA data) becomes the outer ring.
        if !matches!(feature.geometry, Geometry::Polygon(_)) {
            let ring = feature.geometry.coordinates();
            feature.geometry = Geometry::Polygon(if ring.is_empty() { Vec::new() } else { vec![ring] });
        }

        let mut polygon = Self {
            base: ElementBase::new(feature),
        };
        polygon.init_control_points();
        polygon
    }

    /// The outer ring, without a repeated closing vertex.
    pub fn ring(&self) -> &[Coordinate] {
        match &self.base.feature.geometry {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice).unwrap_or_default(),
            _ => &[],
        }
    }
}

impl Element for PolygonElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        let ring = self.ring().to_vec();
        self.base.anchor_points = path_anchors(&ring, true);
        self.base.center_point = geometry::extent_center(&ring);
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        let ring = anchor_coordinates(&points);
        self.base.anchor_points = if update_ghost {
            path_anchors(&ring, true)
        } else {
            points
        };
        self.base.center_point = geometry::extent_center(&ring);
        self.base.feature.geometry = Geometry::Polygon(vec![ring]);
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        let anchors = anchors.unwrap_or_else(|| {
            let (dx, dy) = self.base.delta_to(center);
            translate_anchors(&self.base.anchor_points, dx, dy)
        });
        self.base.feature.geometry = Geometry::Polygon(vec![anchor_coordinates(&anchors)]);
        self.base.anchor_points = anchors;
        self.base.center_point = center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::AnchorKind;
    use crate::feature::{FeatureProperties, PlotType};

    fn square() -> PolygonElement {
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
        ];
        PolygonElement::new(Feature::new(
            PlotType::Polygon,
            Geometry::Polygon(vec![ring]),
            FeatureProperties::default(),
        ))
    }

    #[test]
    fn ghosts_close_the_loop() {
        let polygon = square();
        assert_eq!(polygon.anchor_points().len(), 8);
        let last = polygon.anchor_points()[7];
        assert_eq!(last.kind, AnchorKind::Ghost);
        assert_eq!(last.coordinate, Coordinate::new(0.0, 5.0));
        assert_eq!(polygon.center_point(), Coordinate::new(5.0, 5.0));
    }

    #[test]
    fn promoting_a_ghost_inserts_a_vertex() {
        let mut polygon = square();
        assert!(polygon.promote_ghost(1));
        assert_eq!(polygon.ring().len(), 5);
        assert_eq!(polygon.ring()[1], Coordinate::new(5.0, 0.0));
        assert!(!polygon.promote_ghost(0));
    }

    #[test]
    fn line_string_reads_as_outer_ring() {
        let path = vec![Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 0.0), Coordinate::new(4.0, 4.0)];
        let polygon = PolygonElement::new(Feature::new(
            PlotType::MeasureArea,
            Geometry::LineString(path.clone()),
            FeatureProperties::default(),
        ));
        assert_eq!(polygon.ring(), path.as_slice());
    }
}
