use egui::Vec2;

use crate::element::{
    AnchorPoint, Decoration, DecorationKind, Element, ElementBase, LineElement, PolygonElement,
};
use crate::feature::Feature;
use crate::geometry::{self, Coordinate};
use crate::measure::{self, Projection};

const SEGMENT_LABEL_OFFSET: Vec2 = Vec2::new(0.0, -12.0);
const TOTAL_LABEL_OFFSET: Vec2 = Vec2::new(0.0, -15.0);
const ACTIVE_AREA_LABEL_OFFSET: Vec2 = Vec2::new(0.0, -20.0);

/// A line labelled with the length of each segment and its total length.
#[derive(Debug, Clone)]
pub struct MeasureDistanceElement {
    line: LineElement,
    projection: Projection,
    labels: Vec<Decoration>,
}

impl MeasureDistanceElement {
    pub(crate) fn new(feature: Feature, projection: Projection) -> Self {
        let mut measure = Self {
            line: LineElement::new(feature),
            projection,
            labels: Vec::new(),
        };
        measure.refresh_labels();
        measure
    }

    pub fn length(&self) -> f64 {
        self.projection.length(self.line.path())
    }

    fn refresh_labels(&mut self) {
        self.labels.clear();
        if self.line.anchor_points().len() <= 1 {
            return;
        }

        let path = self.line.path();
        for segment in path.windows(2) {
            self.labels.push(Decoration {
                kind: DecorationKind::SegmentLength,
                position: geometry::midpoint(segment[0], segment[1]),
                text: measure::format_length(self.projection.length(segment)),
                offset: SEGMENT_LABEL_OFFSET,
            });
        }
        if let Some(&last) = path.last() {
            self.labels.push(Decoration {
                kind: DecorationKind::TotalLength,
                position: last,
                text: measure::format_length(self.projection.length(path)),
                offset: TOTAL_LABEL_OFFSET,
            });
        }
    }
}

impl Element for MeasureDistanceElement {
    fn base(&self) -> &ElementBase {
        self.line.base()
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        self.line.base_mut()
    }

    fn init_control_points(&mut self) {
        self.line.init_control_points();
        self.refresh_labels();
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        self.line.set_anchor_points(points, update_ghost);
        self.refresh_labels();
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        self.line.set_center_point(center, anchors);
        self.refresh_labels();
    }

    fn decorations(&self) -> Vec<Decoration> {
        self.labels.clone()
    }

    fn destroy(&mut self) {
        self.line.destroy();
        self.labels.clear();
    }
}

/// A polygon labelled with its enclosed area.
#[derive(Debug, Clone)]
pub struct MeasureAreaElement {
    polygon: PolygonElement,
    projection: Projection,
    label: Option<String>,
}

impl MeasureAreaElement {
    pub(crate) fn new(feature: Feature, projection: Projection) -> Self {
        let mut measure = Self {
            polygon: PolygonElement::new(feature),
            projection,
            label: None,
        };
        measure.refresh_label();
        measure
    }

    pub fn area(&self) -> f64 {
        self.projection.area(self.polygon.ring())
    }

    fn refresh_label(&mut self) {
        self.label = (self.polygon.anchor_points().len() > 1).then(|| measure::format_area(self.area()));
    }
}

impl Element for MeasureAreaElement {
    fn base(&self) -> &ElementBase {
        self.polygon.base()
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        self.polygon.base_mut()
    }

    fn init_control_points(&mut self) {
        self.polygon.init_control_points();
        self.refresh_label();
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        self.polygon.set_anchor_points(points, update_ghost);
        self.refresh_label();
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        self.polygon.set_center_point(center, anchors);
        self.refresh_label();
    }

    fn decorations(&self) -> Vec<Decoration> {
        let Some(text) = &self.label else {
            return Vec::new();
        };

        vec![Decoration {
            kind: DecorationKind::Area,
            position: self.center_point(),
            text: text.clone(),
            offset: if self.is_active() {
                ACTIVE_AREA_LABEL_OFFSET
            } else {
                Vec2::ZERO
            },
        }]
    }

    fn destroy(&mut self) {
        self.polygon.destroy();
        self.label = None;
    }
}
