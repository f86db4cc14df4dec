//! The three interaction engines driven by the plot: drawing new elements,
//! modifying the selected one and removing elements.

mod draw;
mod modify;
mod remove;

pub use draw::{DeferredTask, Draw, DrawState};
pub use modify::{ControlHandle, Modify, PointRecord};
pub use remove::{DeleteAffordance, Remove, delete_position};
