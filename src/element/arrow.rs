use crate::element::{AnchorPoint, Element, ElementBase, LineElement};
use crate::feature::Feature;
use crate::geometry::Coordinate;

/// Polyline with an arrow head on its last vertex.
#[derive(Debug, Clone)]
pub struct ArrowElement {
    line: LineElement,
}

impl ArrowElement {
    pub(crate) fn new(feature: Feature) -> Self {
        Self {
            line: LineElement::new(feature),
        }
    }

    pub fn path(&self) -> &[Coordinate] {
        self.line.path()
    }

    /// Direction of the last segment in radians, counter-clockwise from the
    /// x axis. `None` until the arrow has two vertices.
    pub fn head_rotation(&self) -> Option<f64> {
        match self.path() {
            [.., start, end] => Some((end.y - start.y).atan2(end.x - start.x)),
            _ => None,
        }
    }
}

impl Element for ArrowElement {
    fn base(&self) -> &ElementBase {
        self.line.base()
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        self.line.base_mut()
    }

    fn init_control_points(&mut self) {
        self.line.init_control_points();
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        self.line.set_anchor_points(points, update_ghost);
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        self.line.set_center_point(center, anchors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::PlotType;

    #[test]
    fn head_points_along_last_segment() {
        let mut arrow = ArrowElement::new(Feature::empty(PlotType::Arrow));
        assert_eq!(arrow.head_rotation(), None);

        arrow.set_anchor_points(
            vec![
                AnchorPoint::anchor(Coordinate::new(0.0, 0.0)),
                AnchorPoint::anchor(Coordinate::new(0.0, 10.0)),
            ],
            true,
        );
        let rotation = arrow.head_rotation().unwrap();
        assert!((rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
