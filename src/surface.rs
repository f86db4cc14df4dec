//! What the plot needs from the map it is drawn on.
//!
//! The host owns rendering and projection. The plot only places overlays
//! (control handles and delete buttons) at map coordinates and receives
//! pointer input already converted to map coordinates.

use egui::Vec2;
use uuid::Uuid;

use crate::feature::FeatureId;
use crate::geometry::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(Uuid);

impl OverlayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which control point of the element under modification a handle grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Anchor,
    Ghost,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayContent {
    /// A draggable control handle for the anchor (or center) at `index`.
    Control { kind: HandleKind, index: usize },
    /// The delete button of the element at `index` in the collection.
    DeleteIcon { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySpec {
    pub position: Coordinate,
    /// Pixel offset applied after positioning.
    pub offset: Vec2,
    pub content: OverlayContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// The host map as seen by the plot.
pub trait MapSurface {
    fn add_overlay(&mut self, id: OverlayId, overlay: OverlaySpec);

    fn set_overlay_position(&mut self, id: OverlayId, position: Coordinate);

    fn remove_overlay(&mut self, id: OverlayId);

    /// Hit-test slack in map units at the current zoom.
    fn hit_tolerance(&self) -> f64 {
        0.0
    }

    fn set_cursor(&mut self, _cursor: Cursor) {}
}

/// Pointer input in map coordinates, routed to [`crate::Plot::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(Coordinate),
    /// Delivered after the two clicks that make it up.
    DoubleClick(Coordinate),
    PointerMove(Coordinate),
    ContextMenu(Coordinate),
    /// The pointer went down on an overlay the plot placed.
    OverlayPressed(OverlayId),
    PointerUp,
}

/// Features currently shown on the working layer, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct VectorLayer {
    features: Vec<FeatureId>,
}

impl VectorLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the feature was already on the layer.
    pub fn add_feature(&mut self, id: FeatureId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.features.push(id);
        true
    }

    pub fn remove_feature(&mut self, id: FeatureId) -> bool {
        let before = self.features.len();
        self.features.retain(|f| *f != id);
        self.features.len() != before
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains(&id)
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
