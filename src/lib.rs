#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod data;
pub mod element;
pub mod error;
pub mod event;
pub mod feature;
pub mod geometry;
pub mod measure;
pub mod plot;
pub mod surface;
pub mod tools;

pub use app::PlotApp;
pub use config::{PlotMode, PlotOptions};
pub use data::FeatureCollection;
pub use element::{AnchorPoint, Element, PlotElement};
pub use error::{PlotError, PlotResult};
pub use event::{EventBus, EventKind, PlotEvent};
pub use feature::{FeatureId, PlotType};
pub use geometry::Coordinate;
pub use plot::{DrawingOptions, ElementOptions, Plot};
pub use surface::{MapEvent, MapSurface};
