/// ASCII compositor for glyphstage.
///
/// Rasterizes a scene into an offscreen buffer and converts it into glyphs
/// written to an overlay on the stage.

pub mod color_map;
pub mod compositor;
pub mod error;
pub mod luminance;
pub mod pass;

pub use compositor::AsciiCompositor;
pub use error::RenderError;
pub use pass::{AsciiFrame, AsciiHost};
