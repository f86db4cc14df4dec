use egui::Vec2;

use crate::element::point::single_coordinate;
use crate::element::{AnchorPoint, Decoration, DecorationKind, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::Coordinate;

/// Pixel offset of the text box from its anchor coordinate.
pub const TEXT_LABEL_OFFSET: Vec2 = Vec2::new(12.0, 0.0);

/// Free text pinned to a coordinate. The text is editable while active.
#[derive(Debug, Clone)]
pub struct TextElement {
    base: ElementBase,
}

impl TextElement {
    pub(crate) fn new(mut feature: Feature) -> Self {
        feature.geometry = Geometry::Point(single_coordinate(&feature.geometry));

        let mut text = Self {
            base: ElementBase::new(feature),
        };
        text.init_control_points();
        text
    }

    pub fn text(&self) -> &str {
        self.base.feature.properties.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.base.feature.properties.text = Some(text.into());
    }
}

impl Element for TextElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        self.base.anchor_points.clear();
        self.base.center_point = single_coordinate(&self.base.feature.geometry);
    }

    fn set_anchor_points(&mut self, _points: Vec<AnchorPoint>, _update_ghost: bool) {}

    fn set_center_point(&mut self, center: Coordinate, _anchors: Option<Vec<AnchorPoint>>) {
        self.base.center_point = center;
        self.base.feature.geometry = Geometry::Point(center);
    }

    fn decorations(&self) -> Vec<Decoration> {
        vec![Decoration {
            kind: DecorationKind::Text {
                editable: self.base.active,
            },
            position: self.base.center_point,
            text: self.text().to_owned(),
            offset: TEXT_LABEL_OFFSET,
        }]
    }
}
