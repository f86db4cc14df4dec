mod common;

use common::{all_events, c, edit_plot};
use map_plot::element::{AnchorKind, PlotElement};
use map_plot::feature::Geometry;
use map_plot::plot::{DrawingOptions, ElementOptions};
use map_plot::{Element, EventKind, MapEvent, PlotType};

#[test]
fn circle_takes_radius_from_second_click() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Circle, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(0.0, 0.0)));
    assert!(plot.is_drawing());
    plot.handle_event(MapEvent::Click(c(3.0, 4.0)));

    assert!(!plot.is_drawing());
    let circle = plot.element(id).expect("circle is kept");
    assert_eq!(circle.geometry(), &Geometry::Circle { center: c(0.0, 0.0), radius: 5.0 });
    assert_eq!(circle.feature().properties.radius, Some(5.0));
    assert_eq!(events.borrow().as_slice(), &[(EventKind::DrawEnd, Some(id))]);
}

#[test]
fn rectangle_from_two_corners() {
    let mut plot = edit_plot();
    let id = plot.start_drawing(PlotType::Rectangle, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(0.0, 5.0)));
    plot.handle_event(MapEvent::PointerMove(c(8.0, 1.0)));
    plot.handle_event(MapEvent::Click(c(10.0, 0.0)));

    assert!(!plot.is_drawing());
    let Some(PlotElement::Rectangle(rectangle)) = plot.element(id) else {
        panic!("expected a rectangle");
    };
    assert_eq!(
        rectangle.corners(),
        &[c(0.0, 5.0), c(10.0, 5.0), c(10.0, 0.0), c(0.0, 0.0)]
    );
    assert_eq!(rectangle.center_point(), c(5.0, 2.5));
}

#[test]
fn completing_click_does_not_select() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Point, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(3.0, 4.0)));

    assert!(!plot.is_drawing());
    assert!(plot.active_element().is_none());
    assert_eq!(events.borrow().as_slice(), &[(EventKind::DrawEnd, Some(id))]);

    let Some(PlotElement::Point(point)) = plot.element(id) else {
        panic!("expected a point");
    };
    assert_eq!(point.position(), c(3.0, 4.0));
    assert_eq!(point.icon(), Some("qidian"));

    // The next click on it selects.
    plot.handle_event(MapEvent::Click(c(3.0, 4.0)));
    assert_eq!(plot.active_element().map(Element::id), Some(id));
}

#[test]
fn line_finishes_on_double_click() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Line, DrawingOptions::default());

    for point in [c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(10.0, 10.0)] {
        plot.handle_event(MapEvent::PointerMove(point));
        plot.handle_event(MapEvent::Click(point));
    }
    plot.handle_event(MapEvent::DoubleClick(c(10.0, 10.0)));

    assert!(!plot.is_drawing());
    let line = plot.element(id).expect("line is kept");
    assert_eq!(
        line.geometry(),
        &Geometry::LineString(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)])
    );
    let anchors = line.anchor_points().iter().filter(|p| p.kind == AnchorKind::Anchor).count();
    assert_eq!(anchors, 3);
    assert_eq!(events.borrow().as_slice(), &[(EventKind::DrawEnd, Some(id))]);
}

#[test]
fn context_menu_finishes_polygon() {
    let mut plot = edit_plot();
    let id = plot.start_drawing(PlotType::Polygon, DrawingOptions::default());

    for point in [c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)] {
        plot.handle_event(MapEvent::Click(point));
    }
    assert!(plot.handle_event(MapEvent::ContextMenu(c(1.0, 1.0))));

    assert!(!plot.is_drawing());
    let polygon = plot.element(id).expect("polygon is kept");
    assert_eq!(
        polygon.geometry(),
        &Geometry::Polygon(vec![vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)]])
    );
}

#[test]
fn ellipse_closes_on_second_click() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Ellipse, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(0.0, 0.0)));
    plot.handle_event(MapEvent::PointerMove(c(6.0, 3.0)));
    plot.handle_event(MapEvent::Click(c(6.0, 3.0)));

    assert!(!plot.is_drawing());
    let ellipse = plot.element(id).expect("ellipse is kept");
    let properties = &ellipse.feature().properties;
    assert_eq!(properties.major_radius, Some(6.0));
    assert_eq!(properties.minor_radius, Some(3.0));
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn starting_again_drops_an_unclicked_drawing() {
    let mut plot = edit_plot();
    let events = all_events(&plot);

    let abandoned = plot.start_drawing(PlotType::Line, DrawingOptions::default());
    let current = plot.start_drawing(PlotType::Arrow, DrawingOptions::default());

    assert!(plot.element(abandoned).is_none());
    assert_eq!(plot.drawing_element().map(Element::id), Some(current));
    assert!(events.borrow().is_empty());

    plot.stop_drawing();
    assert!(plot.elements().is_empty());
    assert!(!plot.is_drawing());
}

#[test]
fn stopping_keeps_a_clicked_drawing_without_drawend() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::MeasureDistance, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(0.0, 0.0)));
    plot.stop_drawing();

    assert!(plot.element(id).is_some());
    assert!(plot.layer().contains(id));
    assert!(events.borrow().is_empty());
}

#[test]
fn point_uses_requested_icon() {
    let mut plot = edit_plot();
    plot.register_icons([("flag", "icons/flag.png")]);
    let id = plot.start_drawing(
        PlotType::Point,
        DrawingOptions {
            icon: Some("flag".to_owned()),
        },
    );
    plot.handle_event(MapEvent::Click(c(1.0, 1.0)));

    let Some(PlotElement::Point(point)) = plot.element(id) else {
        panic!("expected a point");
    };
    assert_eq!(point.icon(), Some("flag"));
    assert_eq!(point.icon_source(), Some("icons/flag.png"));
}

#[test]
fn arrow_closes_on_second_click() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Arrow, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(0.0, 0.0)));
    assert!(plot.is_drawing());
    plot.handle_event(MapEvent::PointerMove(c(1.0, 5.0)));
    plot.handle_event(MapEvent::Click(c(0.0, 6.0)));

    assert!(!plot.is_drawing());
    let Some(PlotElement::Arrow(arrow)) = plot.element(id) else {
        panic!("expected an arrow");
    };
    assert_eq!(arrow.path(), &[c(0.0, 0.0), c(0.0, 6.0)]);
    assert_eq!(arrow.head_rotation(), Some(std::f64::consts::FRAC_PI_2));
    assert!(plot.layer().contains(id));
    assert_eq!(events.borrow().as_slice(), &[(EventKind::DrawEnd, Some(id))]);
}

#[test]
fn text_closes_on_first_click() {
    let mut plot = edit_plot();
    let events = all_events(&plot);
    let id = plot.start_drawing(PlotType::Text, DrawingOptions::default());

    plot.handle_event(MapEvent::Click(c(2.0, 3.0)));

    assert!(!plot.is_drawing());
    let text = plot.element(id).expect("text is kept");
    assert_eq!(text.geometry(), &Geometry::Point(c(2.0, 3.0)));
    assert!(plot.layer().contains(id));
    assert!(plot.active_element().is_none());
    assert_eq!(events.borrow().as_slice(), &[(EventKind::DrawEnd, Some(id))]);
}

#[test]
fn drawing_closes_the_delete_buttons() {
    let mut plot = edit_plot();
    plot.add_element(
        PlotType::Point,
        ElementOptions {
            coordinates: vec![c(20.0, 20.0)],
            ..Default::default()
        },
    );
    plot.start_removing();
    assert!(!plot.surface().overlays.is_empty());

    let id = plot.start_drawing(PlotType::Circle, DrawingOptions::default());
    assert!(!plot.is_removing());
    assert!(plot.surface().overlays.is_empty());

    assert!(plot.handle_event(MapEvent::Click(c(0.0, 0.0))));
    assert!(plot.handle_event(MapEvent::Click(c(3.0, 4.0))));

    assert!(!plot.is_drawing());
    assert!(plot.layer().contains(id));
    let circle = plot.element(id).expect("circle is kept");
    assert_eq!(circle.geometry(), &Geometry::Circle { center: c(0.0, 0.0), radius: 5.0 });
}
