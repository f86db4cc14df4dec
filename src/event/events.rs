use crate::element::{Element, PlotElement};
use crate::feature::FeatureId;

/// Events published by the plot to external listeners.
#[derive(Debug, Clone, Copy)]
pub enum PlotEvent<'a> {
    /// A drawing finished with this element.
    DrawEnd(&'a PlotElement),
    /// An element was reshaped, moved or had its text edited.
    Modified(&'a PlotElement),
    /// The element at this index of the collection was deleted.
    Removed { index: usize },
    /// An element became the active selection.
    Selected(&'a PlotElement),
    /// The whole collection was cleared.
    Clear,
}

impl PlotEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            PlotEvent::DrawEnd(_) => EventKind::DrawEnd,
            PlotEvent::Modified(_) => EventKind::Modified,
            PlotEvent::Removed { .. } => EventKind::Removed,
            PlotEvent::Selected(_) => EventKind::Selected,
            PlotEvent::Clear => EventKind::Clear,
        }
    }

    /// Id of the element the event is about, if any.
    pub fn element_id(&self) -> Option<FeatureId> {
        match self {
            PlotEvent::DrawEnd(e) | PlotEvent::Modified(e) | PlotEvent::Selected(e) => Some(e.id()),
            PlotEvent::Removed { .. } | PlotEvent::Clear => None,
        }
    }
}

/// The five event kinds listeners subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DrawEnd,
    Modified,
    Removed,
    Selected,
    Clear,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DrawEnd => "drawend",
            EventKind::Modified => "modified",
            EventKind::Removed => "removed",
            EventKind::Selected => "selected",
            EventKind::Clear => "clear",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
