//! Interactive graph editing on a 2D canvas with an animated depth-first
//! traversal.

mod component;
mod graph;
mod keys;
mod render;
mod state;
mod traversal;
mod types;

pub use component::GraphEditorCanvas;
pub use graph::Graph;
pub use traversal::Traversal;
pub use types::{EditTarget, Mode, Point};
