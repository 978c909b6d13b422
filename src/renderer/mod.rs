//! Rendering module
//!
//! `shapes` builds a platform-independent draw list; `canvas` replays it
//! onto a 2D canvas context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Scene, Shape};
