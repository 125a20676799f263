//! Rendering
//!
//! `scene` turns the simulation model into draw commands and is testable
//! headlessly; `canvas` paints them with the browser's 2D context.

pub mod scene;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::{DrawCmd, Hud};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
