use crate::element::common::{anchor_coordinates, line_center, path_anchors, translate_anchors};
use crate::element::{AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::Coordinate;

/// Open polyline.
#[derive(Debug, Clone)]
pub struct LineElement {
    base: ElementBase,
}

impl LineElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        if !matches!(feature.geometry, Geometry::LineString(_)) {
            feature.geometry = Geometry::LineString(feature.geometry.coordinates());
        }

        let mut line = Self {
            base: ElementBase::new(feature),
        };
        line.init_control_points();
        line
    }

    pub fn path(&self) -> &[Coordinate] {
        match &self.base.feature.geometry {
            Geometry::LineString(path) => path,
            _ => &[],
        }
    }

    fn set_path(&mut self, coordinates: Vec<Coordinate>) {
        self.base.center_point = line_center(&coordinates);
        self.base.feature.geometry = Geometry::LineString(coordinates);
    }
}

impl Element for LineElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        let path = self.path().to_vec();
        self.base.anchor_points = path_anchors(&path, false);
        self.base.center_point = line_center(&path);
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        let coordinates = anchor_coordinates(&points);
        self.base.anchor_points = if update_ghost {
            path_anchors(&coordinates, false)
        } else {
            points
        };
        self.set_path(coordinates);
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        let anchors = anchors.unwrap_or_else(|| {
            let (dx, dy) = self.base.delta_to(center);
            translate_anchors(&self.base.anchor_points, dx, dy)
        });
        self.base.feature.geometry = Geometry::LineString(anchor_coordinates(&anchors));
        self.base.anchor_points = anchors;
        self.base.center_point = center;
    }
}
