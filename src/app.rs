use std::collections::HashMap;

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use crate::config::{PlotMode, PlotOptions};
use crate::element::{Decoration, DecorationKind, Element, PlotElement};
use crate::feature::{FeatureId, Geometry, PlotType};
use crate::geometry::Coordinate;
use crate::measure::Projection;
use crate::plot::{DrawingOptions, Plot};
use crate::surface::{Cursor, HandleKind, MapEvent, MapSurface, OverlayContent, OverlayId, OverlaySpec};

/// Radius in points within which a press grabs an overlay.
const OVERLAY_GRAB_RADIUS: f32 = 7.0;

const SHAPE_COLOR: Color32 = Color32::from_rgb(30, 80, 220);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(230, 120, 20);

/// Canvas-backed map: a planar view centred on `center`, y axis up.
#[derive(Debug)]
pub struct CanvasSurface {
    overlays: HashMap<OverlayId, OverlaySpec>,
    cursor: Cursor,
    rect: Rect,
    center: Coordinate,
    points_per_unit: f64,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self {
            overlays: HashMap::new(),
            cursor: Cursor::Default,
            rect: Rect::NOTHING,
            center: Coordinate::ZERO,
            points_per_unit: 4.0,
        }
    }
}

impl CanvasSurface {
    pub fn to_screen(&self, c: Coordinate) -> Pos2 {
        let origin = self.rect.center();
        Pos2::new(
            origin.x + ((c.x - self.center.x) * self.points_per_unit) as f32,
            origin.y - ((c.y - self.center.y) * self.points_per_unit) as f32,
        )
    }

    pub fn to_map(&self, p: Pos2) -> Coordinate {
        let origin = self.rect.center();
        Coordinate::new(
            self.center.x + f64::from(p.x - origin.x) / self.points_per_unit,
            self.center.y - f64::from(p.y - origin.y) / self.points_per_unit,
        )
    }

    fn overlay_at(&self, pos: Pos2) -> Option<OverlayId> {
        self.overlays
            .iter()
            .map(|(id, spec)| (id, self.to_screen(spec.position) + spec.offset))
            .filter(|(_, p)| p.distance(pos) <= OVERLAY_GRAB_RADIUS)
            .min_by(|(_, a), (_, b)| a.distance(pos).total_cmp(&b.distance(pos)))
            .map(|(id, _)| *id)
    }
}

impl MapSurface for CanvasSurface {
    fn add_overlay(&mut self, id: OverlayId, overlay: OverlaySpec) {
        self.overlays.insert(id, overlay);
    }

    fn set_overlay_position(&mut self, id: OverlayId, position: Coordinate) {
        if let Some(spec) = self.overlays.get_mut(&id) {
            spec.position = position;
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn hit_tolerance(&self) -> f64 {
        f64::from(OVERLAY_GRAB_RADIUS) / self.points_per_unit
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

fn demo_options() -> PlotOptions {
    PlotOptions {
        mode: PlotMode::Edit,
        projection: Projection::Planar,
        ..PlotOptions::default()
    }
}

/// We derive Deserialize/Serialize so we can persist the annotations on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PlotApp {
    options: PlotOptions,
    /// GeoJSON of the annotation set, written on save.
    data: String,
    #[serde(skip)]
    plot: Plot<CanvasSurface>,
    #[serde(skip)]
    show_data: bool,
    #[serde(skip)]
    data_error: Option<String>,
    #[serde(skip)]
    text_draft: Option<(FeatureId, String)>,
    #[serde(skip)]
    grabbed_overlay: bool,
}

impl Default for PlotApp {
    fn default() -> Self {
        let options = demo_options();
        Self {
            plot: Plot::new(CanvasSurface::default(), options.clone()),
            options,
            data: String::new(),
            show_data: false,
            data_error: None,
            text_draft: None,
            grabbed_overlay: false,
        }
    }
}

impl PlotApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: PlotApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.plot = Plot::new(CanvasSurface::default(), app.options.clone());
        app.plot.register_icons([("qidian", "flag")]);
        if !app.data.is_empty() {
            if let Err(err) = app.plot.init_data_json(&app.data) {
                log::warn!("could not restore saved annotations: {err}");
            }
        }
        app
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let drawing = self.plot.drawing_element().map(Element::plot_type);
            for plot_type in PlotType::ALL {
                let selected = drawing == Some(plot_type);
                if ui.selectable_label(selected, plot_type.as_str()).clicked() {
                    log::info!("draw {plot_type} from toolbar");
                    self.plot.start_drawing(plot_type, DrawingOptions::default());
                }
            }
            ui.separator();

            if ui.add_enabled(drawing.is_some(), egui::Button::new("Stop")).clicked() {
                self.plot.stop_drawing();
            }

            let mut removing = self.plot.is_removing();
            if ui.toggle_value(&mut removing, "Remove").changed() {
                if removing {
                    self.plot.start_removing();
                } else {
                    self.plot.stop_removing();
                }
            }
            if ui.button("Clear").clicked() {
                self.plot.clear();
            }
            if ui.button("GeoJSON").clicked() {
                self.refresh_data();
                self.show_data = true;
            }
        });
    }

    fn refresh_data(&mut self) {
        match self.plot.get_data().to_json_pretty() {
            Ok(json) => self.data = json,
            Err(err) => self.data_error = Some(err.to_string()),
        }
    }

    fn data_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_data;
        egui::Window::new("GeoJSON").open(&mut open).show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Export").clicked() {
                    self.refresh_data();
                }
                if ui.button("Import").clicked() {
                    self.data_error = self.plot.init_data_json(&self.data).err().map(|e| e.to_string());
                }
            });
            if let Some(err) = &self.data_error {
                ui.colored_label(Color32::RED, err);
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add(egui::TextEdit::multiline(&mut self.data).code_editor().desired_rows(16));
            });
        });
        self.show_data = open;
    }

    /// Edit box for the selected TEXT element.
    fn text_window(&mut self, ctx: &egui::Context) {
        let Some(text) = self.plot.active_element().and_then(PlotElement::as_text) else {
            self.text_draft = None;
            return;
        };
        let id = text.id();
        if self.text_draft.as_ref().is_none_or(|(draft_id, _)| *draft_id != id) {
            self.text_draft = Some((id, text.text().to_owned()));
        }

        let mut commit = None;
        egui::Window::new("Text").show(ctx, |ui| {
            if let Some((_, draft)) = &mut self.text_draft {
                let response = ui.text_edit_multiline(draft);
                if response.lost_focus() {
                    commit = Some(draft.clone());
                }
            }
        });
        if let Some(text) = commit {
            self.plot.set_text(id, text);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        self.plot.surface_mut().rect = response.rect;

        let (pressed, released, pointer) = ui.input(|i| {
            (i.pointer.primary_pressed(), i.pointer.primary_released(), i.pointer.interact_pos())
        });

        if let Some(pos) = response.hover_pos() {
            let coordinate = self.plot.surface().to_map(pos);
            self.plot.handle_event(MapEvent::PointerMove(coordinate));
        }

        if pressed && response.hovered() {
            if let Some(overlay) = pointer.and_then(|p| self.plot.surface().overlay_at(p)) {
                self.grabbed_overlay = self.plot.handle_event(MapEvent::OverlayPressed(overlay));
            }
        }

        if !self.grabbed_overlay {
            if let Some(pos) = response.interact_pointer_pos() {
                let coordinate = self.plot.surface().to_map(pos);
                if response.clicked() {
                    self.plot.handle_event(MapEvent::Click(coordinate));
                }
                if response.double_clicked() {
                    self.plot.handle_event(MapEvent::DoubleClick(coordinate));
                }
                if response.secondary_clicked() {
                    self.plot.handle_event(MapEvent::ContextMenu(coordinate));
                }
            }
        }

        if released {
            self.plot.handle_event(MapEvent::PointerUp);
            self.grabbed_overlay = false;
        }

        self.paint(&painter);

        if self.plot.surface().cursor == Cursor::Pointer {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }

    fn paint(&self, painter: &egui::Painter) {
        let surface = self.plot.surface();

        for element in self.plot.elements() {
            if !self.plot.layer().contains(element.id()) {
                continue;
            }
            let color = if element.is_active() { ACTIVE_COLOR } else { SHAPE_COLOR };
            paint_element(painter, surface, element, color);
            for decoration in element.decorations() {
                paint_decoration(painter, surface, &decoration);
            }
        }

        for spec in surface.overlays.values() {
            paint_overlay(painter, surface.to_screen(spec.position) + spec.offset, spec.content);
        }
    }
}

fn paint_element(painter: &egui::Painter, surface: &CanvasSurface, element: &PlotElement, color: Color32) {
    let stroke = Stroke::new(2.0, color);
    let screen = |path: &[Coordinate]| -> Vec<Pos2> { path.iter().map(|&c| surface.to_screen(c)).collect() };

    match element.geometry() {
        Geometry::Point(c) => {
            let pos = surface.to_screen(*c);
            if let PlotElement::Point(point) = element {
                painter.circle_filled(pos, 6.0, color);
                if let Some(icon) = point.icon_source() {
                    painter.text(pos + Vec2::new(0.0, -8.0), Align2::CENTER_BOTTOM, icon, FontId::proportional(11.0), color);
                }
            }
        }
        Geometry::LineString(path) => {
            painter.add(Shape::line(screen(path), stroke));
        }
        Geometry::Polygon(rings) => {
            for ring in rings {
                painter.add(Shape::closed_line(screen(ring), stroke));
            }
        }
        Geometry::Circle { center, radius } => {
            let r = (*radius * surface.points_per_unit) as f32;
            painter.circle_stroke(surface.to_screen(*center), r, stroke);
        }
    }

    if let PlotElement::Arrow(arrow) = element {
        if let (Some(rotation), Some(&tip)) = (arrow.head_rotation(), arrow.path().last()) {
            let tip = surface.to_screen(tip);
            // Screen y points down, so the map angle flips.
            let dir = Vec2::angled(-rotation as f32);
            let back = tip - dir * 12.0;
            let side = dir.rot90() * 6.0;
            painter.add(Shape::convex_polygon(vec![tip, back + side, back - side], color, Stroke::NONE));
        }
    }
}

fn paint_decoration(painter: &egui::Painter, surface: &CanvasSurface, decoration: &Decoration) {
    let pos = surface.to_screen(decoration.position) + decoration.offset;
    let (font, color, anchor) = match decoration.kind {
        DecorationKind::SegmentLength => (12.0, Color32::DARK_GRAY, Align2::CENTER_BOTTOM),
        DecorationKind::TotalLength | DecorationKind::Area => (14.0, Color32::BLACK, Align2::CENTER_BOTTOM),
        DecorationKind::Text { editable } => {
            let color = if editable { ACTIVE_COLOR } else { Color32::BLACK };
            (14.0, color, Align2::LEFT_CENTER)
        }
    };
    painter.text(pos, anchor, &decoration.text, FontId::proportional(font), color);
}

fn paint_overlay(painter: &egui::Painter, pos: Pos2, content: OverlayContent) {
    match content {
        OverlayContent::Control { kind: HandleKind::Anchor, .. } => {
            painter.rect_filled(Rect::from_center_size(pos, Vec2::splat(8.0)), 1.0, Color32::WHITE);
            painter.rect_stroke(Rect::from_center_size(pos, Vec2::splat(8.0)), 1.0, Stroke::new(1.5, SHAPE_COLOR));
        }
        OverlayContent::Control { kind: HandleKind::Ghost, .. } => {
            painter.circle_stroke(pos, 3.5, Stroke::new(1.0, SHAPE_COLOR));
        }
        OverlayContent::Control { kind: HandleKind::Center, .. } => {
            painter.circle_filled(pos, 5.0, ACTIVE_COLOR);
        }
        OverlayContent::DeleteIcon { .. } => {
            painter.circle_filled(pos, 7.5, Color32::RED);
            painter.text(pos, Align2::CENTER_CENTER, "-", FontId::proportional(14.0), Color32::WHITE);
        }
    }
}

impl eframe::App for PlotApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.refresh_data();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} elements", self.plot.elements().len()));
                if let Some(element) = self.plot.active_element() {
                    ui.separator();
                    ui.label(format!("selected {} {}", element.plot_type(), element.id()));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        self.text_window(ctx);
        if self.show_data {
            self.data_window(ctx);
        }
    }
}
