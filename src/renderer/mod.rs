//! Render adapter
//!
//! Reads a battle through `RenderView` and produces triangle-list vertices.
//! Nothing here can mutate simulation state.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::{RenderView, build_scene};
pub use vertex::Vertex;
