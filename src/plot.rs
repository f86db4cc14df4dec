use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use log::{debug, info};

use crate::config::{PlotMode, PlotOptions};
use crate::data::{self, FeatureCollection};
use crate::element::factory::{self, FactoryOptions};
use crate::element::{Element, IconRegistry, PlotElement};
use crate::error::PlotResult;
use crate::event::{EventBus, EventKind, ListenerId, ListenerResult, PlotEvent};
use crate::feature::{Feature, FeatureId, FeatureProperties, Geometry, PlotType};
use crate::geometry::Coordinate;
use crate::surface::{Cursor, MapEvent, MapSurface, VectorLayer};
use crate::tools::{DeferredTask, Draw, Modify, Remove};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingOptions {
    /// Icon for a POINT; the configured default icon when `None`.
    pub icon: Option<String>,
}

/// Everything needed to place an element without drawing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementOptions {
    pub icon: Option<String>,
    pub text: Option<String>,
    /// Vertices for line-like and polygon types, the position for point-like
    /// types, the two corners for a rectangle.
    pub coordinates: Vec<Coordinate>,
    pub radius: Option<f64>,
    pub major_radius: Option<f64>,
    pub minor_radius: Option<f64>,
}

/// An annotation layer on a map: the element collection plus the engines
/// that draw, modify and remove elements.
pub struct Plot<S: MapSurface> {
    options: PlotOptions,
    surface: S,
    layer: VectorLayer,
    elements: Vec<PlotElement>,
    active: Option<FeatureId>,
    icons: IconRegistry,
    bus: Rc<EventBus>,
    draw: Option<Draw>,
    modify: Option<Modify>,
    remove: Option<Remove>,
    deferred_tx: UnboundedSender<DeferredTask>,
    deferred_rx: UnboundedReceiver<DeferredTask>,
}

impl<S: MapSurface> std::fmt::Debug for Plot<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plot")
            .field("mode", &self.options.mode)
            .field("elements", &self.elements.len())
            .field("active", &self.active)
            .field("draw", &self.draw)
            .finish_non_exhaustive()
    }
}

impl<S: MapSurface> Plot<S> {
    pub fn new(surface: S, options: PlotOptions) -> Self {
        Self::with_event_bus(surface, options, Rc::new(EventBus::new()))
    }

    /// Build a plot that publishes on an existing bus.
    pub fn with_event_bus(surface: S, options: PlotOptions, bus: Rc<EventBus>) -> Self {
        let (deferred_tx, deferred_rx) = mpsc::unbounded();
        let modify = (options.mode == PlotMode::Edit).then(|| Modify::new(Rc::clone(&bus)));

        Self {
            options,
            surface,
            layer: VectorLayer::new(),
            elements: Vec::new(),
            active: None,
            icons: IconRegistry::new(),
            bus,
            draw: None,
            modify,
            remove: None,
            deferred_tx,
            deferred_rx,
        }
    }

    pub fn mode(&self) -> PlotMode {
        self.options.mode
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn layer(&self) -> &VectorLayer {
        &self.layer
    }

    pub fn event_bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn elements(&self) -> &[PlotElement] {
        &self.elements
    }

    pub fn element(&self, id: FeatureId) -> Option<&PlotElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn active_element(&self) -> Option<&PlotElement> {
        self.active.and_then(|id| self.element(id))
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.as_ref().is_some_and(Draw::is_drawing)
    }

    /// The element being drawn, if any.
    pub fn drawing_element(&self) -> Option<&PlotElement> {
        self.draw
            .as_ref()
            .and_then(Draw::element_id)
            .and_then(|id| self.element(id))
    }

    pub fn is_removing(&self) -> bool {
        self.remove.is_some()
    }

    pub fn modify(&self) -> Option<&Modify> {
        self.modify.as_ref()
    }

    pub fn remover(&self) -> Option<&Remove> {
        self.remove.as_ref()
    }

    /// Subscribe a listener to one kind of event.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&PlotEvent<'_>) -> ListenerResult + 'static,
    {
        self.bus.on(kind, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Merge icon name to image source entries into the registry.
    pub fn register_icons<K, V>(&mut self, icons: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.icons.register(icons);
    }

    fn position(&self, id: FeatureId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    fn build(&self, feature: Feature) -> PlotElement {
        let options = FactoryOptions {
            icons: Some(&self.icons),
            projection: self.options.projection,
        };
        factory::from_feature(feature, &options)
    }

    fn refresh_remove(&mut self) {
        if let Some(remove) = &mut self.remove {
            remove.refresh(&self.elements, &mut self.surface);
        }
    }

    /// Start drawing a new element of `plot_type`. Any drawing in progress
    /// is stopped first, and so are the delete buttons.
    pub fn start_drawing(&mut self, plot_type: PlotType, options: DrawingOptions) -> FeatureId {
        self.stop_removing();
        if self.is_drawing() {
            self.stop_drawing();
        }

        let mut feature = Feature::empty(plot_type);
        if plot_type == PlotType::Point {
            feature.properties.icon = Some(options.icon.unwrap_or_else(|| self.options.default_icon.clone()));
        }

        let element = self.build(feature);
        let id = element.id();

        let bus = Rc::clone(&self.bus);
        let deferred = self.deferred_tx.clone();
        let draw = self.draw.get_or_insert_with(|| Draw::new(bus, deferred));
        draw.open(&element);
        self.elements.push(element);
        id
    }

    /// Close the drawing without publishing `drawend`. An element that never
    /// received a click is dropped from the collection.
    pub fn stop_drawing(&mut self) {
        let Some(draw) = &mut self.draw else {
            return;
        };
        let Some(id) = draw.element_id() else {
            return;
        };

        draw.close(None);
        if !self.layer.contains(id) {
            if let Some(index) = self.position(id) {
                debug!("discarding undrawn {id}");
                self.elements.remove(index);
            }
        }
    }

    /// Show delete buttons. Selection and drawing are stopped first.
    pub fn start_removing(&mut self) {
        self.stop_drawing();
        self.deactivate();
        if let Some(modify) = &mut self.modify {
            modify.remove_control_points(&mut self.surface);
        }

        let mut remove = self
            .remove
            .take()
            .unwrap_or_else(|| Remove::new(Rc::clone(&self.bus)));
        remove.refresh(&self.elements, &mut self.surface);
        self.remove = Some(remove);
        info!("removing, {} elements", self.elements.len());
    }

    pub fn stop_removing(&mut self) {
        if let Some(mut remove) = self.remove.take() {
            remove.destroy(&mut self.surface);
        }
    }

    fn clear_no_event(&mut self) {
        if let Some(draw) = &mut self.draw {
            draw.close(None);
        }
        self.deactivate();
        for element in &mut self.elements {
            element.destroy();
        }
        self.elements.clear();
        self.layer.clear();
        self.refresh_remove();
    }

    /// Replace the collection with elements read from `collection`.
    pub fn init_data(&mut self, collection: &FeatureCollection) {
        self.clear_no_event();

        let options = FactoryOptions {
            icons: Some(&self.icons),
            projection: self.options.projection,
        };
        self.elements = data::from_collection(collection, &options);
        for element in &self.elements {
            self.layer.add_feature(element.id());
        }
        self.refresh_remove();
        info!("loaded {} of {} features", self.elements.len(), collection.features.len());
    }

    pub fn init_data_json(&mut self, json: &str) -> PlotResult<()> {
        let collection = FeatureCollection::from_json(json)?;
        self.init_data(&collection);
        Ok(())
    }

    /// Place an element directly, without the draw engine.
    pub fn add_element(&mut self, plot_type: PlotType, options: ElementOptions) -> FeatureId {
        let ElementOptions {
            icon,
            text,
            coordinates,
            radius,
            major_radius,
            minor_radius,
        } = options;
        let first = coordinates.first().copied().unwrap_or_default();

        let mut properties = FeatureProperties {
            icon,
            text,
            radius,
            major_radius,
            minor_radius,
            ..Default::default()
        };
        let geometry = match plot_type {
            PlotType::Point | PlotType::Text | PlotType::Circle => Geometry::Point(first),
            PlotType::Ellipse => {
                properties.center = Some(first);
                Geometry::Point(first)
            }
            PlotType::Line | PlotType::Arrow | PlotType::MeasureDistance => Geometry::LineString(coordinates),
            PlotType::Polygon | PlotType::MeasureArea => {
                Geometry::Polygon(if coordinates.is_empty() { Vec::new() } else { vec![coordinates] })
            }
            PlotType::Rectangle => {
                properties.coordinates = Some(coordinates);
                Geometry::Polygon(Vec::new())
            }
        };

        let element = self.build(Feature::new(plot_type, geometry, properties));
        let id = element.id();
        self.layer.add_feature(id);
        self.elements.push(element);
        self.refresh_remove();
        id
    }

    /// Destroy every element and publish `clear`.
    pub fn clear(&mut self) {
        self.clear_no_event();
        info!("cleared");
        self.bus.emit(&PlotEvent::Clear);
    }

    pub fn get_data(&self) -> FeatureCollection {
        data::to_collection(&self.elements)
    }

    pub fn to_json(&self) -> PlotResult<String> {
        self.get_data().to_json()
    }

    /// Select the element `id`, publishing `selected`. Does nothing in view
    /// mode or when the element is already selected.
    pub fn activate(&mut self, id: FeatureId) {
        if self.options.mode == PlotMode::View || self.active == Some(id) {
            return;
        }
        let Some(index) = self.position(id) else {
            return;
        };

        self.bus.emit(&PlotEvent::Selected(&self.elements[index]));

        self.deactivate();
        self.active = Some(id);
        let element = &mut self.elements[index];
        element.activate();
        debug!("activated {} {id}", element.plot_type());
        if let Some(modify) = &mut self.modify {
            modify.set_element(Some(&*element), &mut self.surface);
        }
    }

    pub fn deactivate(&mut self) {
        if self.options.mode == PlotMode::View {
            return;
        }
        let Some(id) = self.active.take() else {
            return;
        };

        if let Some(index) = self.position(id) {
            self.elements[index].deactivate();
        }
        if let Some(modify) = &mut self.modify {
            modify.set_element(None, &mut self.surface);
        }
    }

    /// Replace the text of a TEXT element and publish `modified`.
    pub fn set_text(&mut self, id: FeatureId, text: impl Into<String>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let Some(label) = self.elements[index].as_text_mut() else {
            return false;
        };

        label.set_text(text);
        self.bus.emit(&PlotEvent::Modified(&self.elements[index]));
        true
    }

    /// Topmost element under `coordinate`.
    pub fn hit_test(&self, coordinate: Coordinate) -> Option<FeatureId> {
        let tolerance = self.surface.hit_tolerance();
        self.elements
            .iter()
            .rev()
            .filter(|e| self.layer.contains(e.id()))
            .find(|e| e.hit_test(coordinate, tolerance))
            .map(Element::id)
    }

    /// Route one pointer event from the host. Returns true when the plot
    /// consumed it.
    pub fn handle_event(&mut self, event: MapEvent) -> bool {
        let consumed = match event {
            MapEvent::Click(coordinate) => self.handle_click(coordinate),
            MapEvent::DoubleClick(_) => self.with_drawing(|draw, element, _| draw.handle_double_click(element)),
            MapEvent::ContextMenu(_) => self.with_drawing(|draw, element, _| draw.handle_context_menu(element)),
            MapEvent::PointerMove(coordinate) => self.handle_pointer_move(coordinate),
            MapEvent::OverlayPressed(overlay) => self.handle_overlay_pressed(overlay),
            MapEvent::PointerUp => self.handle_pointer_up(),
        };

        self.run_deferred();
        consumed
    }

    /// Run `f` on the draw engine and the element it is drawing.
    fn with_drawing<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Draw, &mut PlotElement, &mut VectorLayer) -> bool,
    {
        let Some(draw) = &mut self.draw else {
            return false;
        };
        let Some(id) = draw.element_id() else {
            return false;
        };
        let Some(element) = self.elements.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        f(draw, element, &mut self.layer)
    }

    fn handle_click(&mut self, coordinate: Coordinate) -> bool {
        if self.is_removing() {
            return false;
        }

        // Drawing takes priority over selection.
        if self.is_drawing() {
            self.deactivate();
            return self.with_drawing(|draw, element, layer| {
                draw.handle_click(element, layer, coordinate);
                true
            });
        }

        match self.hit_test(coordinate) {
            Some(id) => {
                self.activate(id);
                true
            }
            None => {
                self.deactivate();
                false
            }
        }
    }

    fn handle_pointer_move(&mut self, coordinate: Coordinate) -> bool {
        if self.is_drawing() {
            return self.with_drawing(|draw, element, _| {
                draw.handle_pointer_move(element, coordinate);
                true
            });
        }

        if let (Some(modify), Some(id)) = (&mut self.modify, self.active) {
            if modify.is_dragging() {
                if let Some(element) = self.elements.iter_mut().find(|e| e.id() == id) {
                    return modify.pointer_move(coordinate, element, &mut self.surface);
                }
            }
        }

        let cursor = if self.hit_test(coordinate).is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        };
        self.surface.set_cursor(cursor);
        false
    }

    fn handle_overlay_pressed(&mut self, overlay: crate::surface::OverlayId) -> bool {
        if let Some(remove) = &mut self.remove {
            if remove.owns(overlay) {
                let removed = remove.press(overlay, &mut self.elements, &mut self.layer, &mut self.surface);
                return removed.is_some();
            }
        }

        let (Some(modify), Some(id)) = (&mut self.modify, self.active) else {
            return false;
        };
        if !modify.owns(overlay) {
            return false;
        }
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => modify.press(overlay, element, &mut self.surface),
            None => false,
        }
    }

    fn handle_pointer_up(&mut self) -> bool {
        let (Some(modify), Some(id)) = (&mut self.modify, self.active) else {
            return false;
        };
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => modify.release(element, &mut self.surface),
            None => false,
        }
    }

    /// Work deferred by the draw engine until the input event was handled.
    fn run_deferred(&mut self) {
        while let Ok(task) = self.deferred_rx.try_recv() {
            match task {
                DeferredTask::CloseDraw(id) => {
                    let Some(draw) = &mut self.draw else {
                        continue;
                    };
                    if draw.element_id() != Some(id) {
                        continue;
                    }
                    let element = self.elements.iter().find(|e| e.id() == id);
                    draw.close(element);
                }
            }
        }
    }

    /// Tear down every element, overlay and engine.
    pub fn destroy(&mut self) {
        self.deactivate();
        if let Some(mut modify) = self.modify.take() {
            modify.destroy(&mut self.surface);
        }
        if let Some(mut remove) = self.remove.take() {
            remove.destroy(&mut self.surface);
        }
        if let Some(mut draw) = self.draw.take() {
            draw.destroy();
        }
        for element in &mut self.elements {
            element.destroy();
        }
        self.elements.clear();
        self.layer.clear();
        self.active = None;
    }
}
