mod common;

use common::c;
use map_plot::element::factory::{self, FactoryOptions};
use map_plot::element::AnchorPoint;
use map_plot::feature::{FeatureProperties, Geometry};
use map_plot::{Coordinate, Element, PlotElement};

fn build(tag: &str, geometry: Geometry, properties: FeatureProperties) -> PlotElement {
    factory::create_element(tag, geometry, properties, &FactoryOptions::default()).expect("known type")
}

fn assert_same_shape(actual: &Geometry, expected: &Geometry) {
    let near = |a: &[Coordinate], b: &[Coordinate]| {
        a.len() == b.len() && a.iter().zip(b).all(|(p, q)| (p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9)
    };
    let same = match (actual, expected) {
        (Geometry::Circle { center: a, radius: r }, Geometry::Circle { center: b, radius: s }) => {
            near(&[*a], &[*b]) && (r - s).abs() < 1e-9
        }
        (Geometry::Point(_), Geometry::Point(_))
        | (Geometry::LineString(_), Geometry::LineString(_))
        | (Geometry::Polygon(_), Geometry::Polygon(_)) => near(&actual.coordinates(), &expected.coordinates()),
        _ => false,
    };
    assert!(same, "{actual:?} != {expected:?}");
}

/// Re-deriving the control points from the geometry, and feeding them
/// back, must leave the geometry where it was.
fn assert_rederives(element: &mut PlotElement) {
    let before = element.geometry().clone();

    element.init_control_points();
    assert_same_shape(element.geometry(), &before);

    let anchors = element.anchor_points().to_vec();
    element.set_anchor_points(anchors, true);
    assert_same_shape(element.geometry(), &before);
}

/// Reshape through anchors, move through the center, and check the
/// control points after each step.
fn exercise(mut element: PlotElement, anchors: Vec<AnchorPoint>, center: Coordinate) {
    element.set_anchor_points(anchors, true);
    assert_rederives(&mut element);

    element.set_center_point(center, None);
    assert_rederives(&mut element);
}

fn path_anchors(coordinates: &[Coordinate]) -> Vec<AnchorPoint> {
    coordinates.iter().copied().map(AnchorPoint::anchor).collect()
}

#[test]
fn point_control_points_are_stable() {
    let point = build("POINT", Geometry::Point(c(1.0, 1.0)), FeatureProperties::default());
    exercise(point, Vec::new(), c(4.0, -2.0));
}

#[test]
fn text_control_points_are_stable() {
    let properties = FeatureProperties {
        text: Some("quay".to_owned()),
        ..Default::default()
    };
    let text = build("TEXT", Geometry::Point(c(1.0, 1.0)), properties);
    exercise(text, Vec::new(), c(-3.0, 8.0));
}

#[test]
fn line_control_points_are_stable() {
    let line = build("LINE", Geometry::LineString(Vec::new()), FeatureProperties::default());
    exercise(line, path_anchors(&[c(0.0, 0.0), c(4.0, 2.0), c(9.0, 2.0)]), c(3.0, 3.0));
}

#[test]
fn arrow_control_points_are_stable() {
    let arrow = build("ARROW", Geometry::LineString(Vec::new()), FeatureProperties::default());
    exercise(arrow, path_anchors(&[c(0.0, 0.0), c(0.0, 7.0)]), c(-1.0, 2.0));
}

#[test]
fn polygon_control_points_are_stable() {
    let polygon = build("POLYGON", Geometry::Polygon(Vec::new()), FeatureProperties::default());
    exercise(polygon, path_anchors(&[c(0.0, 0.0), c(6.0, 0.0), c(6.0, 3.0), c(0.0, 3.0)]), c(10.0, 10.0));
}

#[test]
fn circle_control_points_are_stable() {
    let circle = build("CIRCLE", Geometry::Point(c(2.0, 2.0)), FeatureProperties::default());
    exercise(circle, vec![AnchorPoint::anchor(c(5.0, 6.0))], c(-4.0, 1.0));
}

#[test]
fn ellipse_control_points_are_stable() {
    let properties = FeatureProperties {
        major_radius: Some(4.0),
        minor_radius: Some(2.0),
        ..Default::default()
    };
    let ellipse = build("ELLIPSE", Geometry::Point(c(1.0, 1.0)), properties);
    exercise(ellipse, path_anchors(&[c(7.0, 3.0), c(2.0, 4.5)]), c(-2.5, 0.5));
}

#[test]
fn rectangle_control_points_are_stable() {
    let properties = FeatureProperties {
        coordinates: Some(vec![c(0.0, 5.0), c(10.0, 0.0)]),
        ..Default::default()
    };
    let rectangle = build("RECTANGLE", Geometry::Polygon(Vec::new()), properties);
    exercise(rectangle, path_anchors(&[c(-2.0, 1.0), c(3.0, 9.0)]), c(20.0, 20.0));
}

#[test]
fn measure_distance_control_points_are_stable() {
    let measure = build("MEASURE_DISTANCE", Geometry::LineString(Vec::new()), FeatureProperties::default());
    exercise(measure, path_anchors(&[c(0.0, 0.0), c(30.0, 40.0), c(30.0, 0.0)]), c(5.0, 5.0));
}

#[test]
fn measure_area_control_points_are_stable() {
    let measure = build("MEASURE_AREA", Geometry::Polygon(Vec::new()), FeatureProperties::default());
    exercise(measure, path_anchors(&[c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)]), c(1.0, 1.0));
}
