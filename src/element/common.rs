use crate::element::{AnchorKind, AnchorPoint};
use crate::feature::Feature;
use crate::geometry::{self, Coordinate};

/// Vertical bias added to the first vertex of line-like shapes to place
/// their center handle just above the line.
pub const LINE_CENTER_OFFSET: f64 = 0.06;

/// State shared by every element variant.
#[derive(Debug, Clone)]
pub struct ElementBase {
    pub(crate) feature: Feature,
    pub(crate) active: bool,
    pub(crate) anchor_points: Vec<AnchorPoint>,
    pub(crate) center_point: Coordinate,
}

impl ElementBase {
    pub(crate) fn new(feature: Feature) -> Self {
        Self {
            feature,
            active: false,
            anchor_points: Vec::new(),
            center_point: Coordinate::ZERO,
        }
    }

    /// Offset from the current center to `center`.
    pub(crate) fn delta_to(&self, center: Coordinate) -> (f64, f64) {
        (center.x - self.center_point.x, center.y - self.center_point.y)
    }
}

/// The coordinates of the true anchors, ghosts dropped.
pub(crate) fn anchor_coordinates(points: &[AnchorPoint]) -> Vec<Coordinate> {
    points
        .iter()
        .filter(|p| p.kind == AnchorKind::Anchor)
        .map(|p| p.coordinate)
        .collect()
}

/// Interleave vertices with ghost midpoints: anchor, ghost, anchor, ...
/// A closed path also gets a ghost between the last and first vertex.
pub(crate) fn path_anchors(coordinates: &[Coordinate], closed: bool) -> Vec<AnchorPoint> {
    let mut anchors = Vec::with_capacity(coordinates.len() * 2);
    for (i, &c) in coordinates.iter().enumerate() {
        anchors.push(AnchorPoint::anchor(c));
        if let Some(&next) = coordinates.get(i + 1) {
            anchors.push(AnchorPoint::ghost(geometry::midpoint(c, next)));
        } else if closed {
            anchors.push(AnchorPoint::ghost(geometry::midpoint(c, coordinates[0])));
        }
    }
    anchors
}

pub(crate) fn translate_anchors(points: &[AnchorPoint], dx: f64, dy: f64) -> Vec<AnchorPoint> {
    points.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Center handle of line-like shapes: the first vertex, nudged up.
pub(crate) fn line_center(coordinates: &[Coordinate]) -> Coordinate {
    coordinates
        .first()
        .map(|c| c.offset(0.0, LINE_CENTER_OFFSET))
        .unwrap_or_default()
}
