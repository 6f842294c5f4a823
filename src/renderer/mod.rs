//! 2D rendering
//!
//! Read-only view of the simulation. Geometry lives in `shapes`; the canvas
//! backend only exists in the browser build.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
