use egui::Vec2;

mod arrow;
mod circle;
mod common;
mod ellipse;
mod line;
mod measure;
mod point;
mod polygon;
mod rectangle;
mod text;

pub use arrow::ArrowElement;
pub use circle::CircleElement;
pub use common::{ElementBase, LINE_CENTER_OFFSET};
pub use ellipse::EllipseElement;
pub use line::LineElement;
pub use measure::{MeasureAreaElement, MeasureDistanceElement};
pub use point::{IconRegistry, PointElement};
pub use polygon::PolygonElement;
pub use rectangle::RectangleElement;
pub use text::TextElement;

use crate::feature::{Feature, FeatureId, Geometry, PlotType};
use crate::geometry::Coordinate;

/// Whether a control point defines the shape or is a midpoint waiting to be
/// promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Anchor,
    Ghost,
}

/// Axis tag carried by the two ellipse anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorAttr {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub kind: AnchorKind,
    pub coordinate: Coordinate,
    pub attr: Option<AnchorAttr>,
}

impl AnchorPoint {
    pub fn anchor(coordinate: Coordinate) -> Self {
        Self {
            kind: AnchorKind::Anchor,
            coordinate,
            attr: None,
        }
    }

    pub fn ghost(coordinate: Coordinate) -> Self {
        Self {
            kind: AnchorKind::Ghost,
            coordinate,
            attr: None,
        }
    }

    pub fn with_attr(mut self, attr: AnchorAttr) -> Self {
        self.attr = Some(attr);
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = coordinate;
        self
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        self.with_coordinate(self.coordinate.offset(dx, dy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    SegmentLength,
    TotalLength,
    Area,
    Text { editable: bool },
}

/// A label the host draws next to an element, positioned in map
/// coordinates and nudged by a pixel offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: Coordinate,
    pub text: String,
    pub offset: Vec2,
}

/// Common contract of all annotation elements.
///
/// Every call that changes the anchor points or the center point rewrites
/// the backing feature, so that rebuilding the element from its feature
/// yields the same control points again.
pub trait Element {
    fn base(&self) -> &ElementBase;

    fn base_mut(&mut self) -> &mut ElementBase;

    fn id(&self) -> FeatureId {
        self.base().feature.id()
    }

    fn plot_type(&self) -> PlotType {
        self.base().feature.plot_type()
    }

    fn feature(&self) -> &Feature {
        &self.base().feature
    }

    fn geometry(&self) -> &Geometry {
        &self.base().feature.geometry
    }

    fn anchor_points(&self) -> &[AnchorPoint] {
        &self.base().anchor_points
    }

    fn center_point(&self) -> Coordinate {
        self.base().center_point
    }

    fn is_active(&self) -> bool {
        self.base().active
    }

    fn activate(&mut self) {
        self.base_mut().active = true;
    }

    fn deactivate(&mut self) {
        self.base_mut().active = false;
    }

    /// Derive anchor and center points from the current feature.
    fn init_control_points(&mut self);

    /// Replace the anchor points and rewrite the geometry from them. With
    /// `update_ghost`, ghosts in `points` are dropped and regenerated from
    /// the surviving anchors.
    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool);

    /// Move the center. `anchors` are the already translated anchor points;
    /// when `None` the current ones are translated by the center delta.
    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>);

    /// Turn the ghost at `index` into a real anchor in place. Returns false
    /// when there is no ghost at that index.
    fn promote_ghost(&mut self, index: usize) -> bool {
        let mut points = self.anchor_points().to_vec();
        match points.get_mut(index) {
            Some(point) if point.kind == AnchorKind::Ghost => point.kind = AnchorKind::Anchor,
            _ => return false,
        }
        self.set_anchor_points(points, false);
        true
    }

    fn decorations(&self) -> Vec<Decoration> {
        Vec::new()
    }

    fn destroy(&mut self) {
        let base = self.base_mut();
        base.active = false;
        base.anchor_points.clear();
    }
}

/// One annotation on the plot layer.
#[derive(Debug, Clone)]
pub enum PlotElement {
    Point(PointElement),
    Line(LineElement),
    Polygon(PolygonElement),
    Circle(CircleElement),
    Ellipse(EllipseElement),
    Rectangle(RectangleElement),
    Text(TextElement),
    Arrow(ArrowElement),
    MeasureDistance(MeasureDistanceElement),
    MeasureArea(MeasureAreaElement),
}

macro_rules! dispatch {
    ($element:expr, $inner:ident => $body:expr) => {
        match $element {
            PlotElement::Point($inner) => $body,
            PlotElement::Line($inner) => $body,
            PlotElement::Polygon($inner) => $body,
            PlotElement::Circle($inner) => $body,
            PlotElement::Ellipse($inner) => $body,
            PlotElement::Rectangle($inner) => $body,
            PlotElement::Text($inner) => $body,
            PlotElement::Arrow($inner) => $body,
            PlotElement::MeasureDistance($inner) => $body,
            PlotElement::MeasureArea($inner) => $body,
        }
    };
}

impl Element for PlotElement {
    fn base(&self) -> &ElementBase {
        dispatch!(self, e => e.base())
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        dispatch!(self, e => e.base_mut())
    }

    fn activate(&mut self) {
        dispatch!(self, e => e.activate())
    }

    fn deactivate(&mut self) {
        dispatch!(self, e => e.deactivate())
    }

    fn init_control_points(&mut self) {
        dispatch!(self, e => e.init_control_points())
    }

    fn set_anchor_points(&mut self, points: Vec<AnchorPoint>, update_ghost: bool) {
        dispatch!(self, e => e.set_anchor_points(points, update_ghost))
    }

    fn set_center_point(&mut self, center: Coordinate, anchors: Option<Vec<AnchorPoint>>) {
        dispatch!(self, e => e.set_center_point(center, anchors))
    }

    fn promote_ghost(&mut self, index: usize) -> bool {
        dispatch!(self, e => e.promote_ghost(index))
    }

    fn decorations(&self) -> Vec<Decoration> {
        dispatch!(self, e => e.decorations())
    }

    fn destroy(&mut self) {
        dispatch!(self, e => e.destroy())
    }
}

impl PlotElement {
    /// Whether `coordinate` touches this element, within `tolerance` map units.
    pub fn hit_test(&self, coordinate: Coordinate, tolerance: f64) -> bool {
        self.geometry().hit_test(coordinate, tolerance)
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            PlotElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            PlotElement::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;
    use crate::feature::FeatureProperties;
    use crate::measure::Projection;

    /// What an element may need from its surroundings when it is built.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FactoryOptions<'a> {
        pub icons: Option<&'a IconRegistry>,
        pub projection: Projection,
    }

    /// Build the element for a type tag such as `"POLYGON"`. Unknown tags
    /// yield `None`.
    pub fn create_element(
        type_tag: &str,
        geometry: Geometry,
        properties: FeatureProperties,
        options: &FactoryOptions<'_>,
    ) -> Option<PlotElement> {
        let plot_type = type_tag.parse::<PlotType>().ok()?;
        Some(from_feature(Feature::new(plot_type, geometry, properties), options))
    }

    /// Wrap a feature in the element variant of its type.
    pub fn from_feature(feature: Feature, options: &FactoryOptions<'_>) -> PlotElement {
        let empty = IconRegistry::default();
        let icons = options.icons.unwrap_or(&empty);

        match feature.plot_type() {
            PlotType::Point => PlotElement::Point(PointElement::new(feature, icons)),
            PlotType::Line => PlotElement::Line(LineElement::new(feature)),
            PlotType::Polygon => PlotElement::Polygon(PolygonElement::new(feature)),
            PlotType::Circle => PlotElement::Circle(CircleElement::new(feature)),
            PlotType::Ellipse => PlotElement::Ellipse(EllipseElement::new(feature)),
            PlotType::Rectangle => PlotElement::Rectangle(RectangleElement::new(feature)),
            PlotType::Text => PlotElement::Text(TextElement::new(feature)),
            PlotType::Arrow => PlotElement::Arrow(ArrowElement::new(feature)),
            PlotType::MeasureDistance => {
                PlotElement::MeasureDistance(MeasureDistanceElement::new(feature, options.projection))
            }
            PlotType::MeasureArea => {
                PlotElement::MeasureArea(MeasureAreaElement::new(feature, options.projection))
            }
        }
    }

    /// A fresh element of `plot_type` with empty starting geometry.
    pub fn create(plot_type: PlotType, options: &FactoryOptions<'_>) -> PlotElement {
        from_feature(Feature::empty(plot_type), options)
    }
}
