//! Raster previews of land patterns.
//!
//! [`render::render_png`] is the entry point. It sets up a
//! [`TransformContext`] mapping millimetres to pixels and draws each
//! primitive onto a `tiny-skia` backed [`RasterCanvas`].

pub mod raster;
pub mod render;
pub mod transform;

pub use raster::RasterCanvas;
pub use render::{draw_package, render_canvas, render_image, render_png, PREVIEW_MARGIN};
pub use transform::{Canvas, Color, TransformContext};
