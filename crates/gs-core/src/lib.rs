/// Configuration, types, and shared structures for glyphstage.
///
/// This crate contains the shared types used across the workspace: the
/// character ramp, pixel and glyph buffers, the stage and its overlays,
/// and the ordered frame loop.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod schedule;
pub mod surface;

pub use charset::{CharacterRamp, LuminanceLut};
pub use config::{CompositorConfig, CompositorOptions, DemoConfig};
pub use error::CoreError;
pub use frame::{FrameBuffer, GlyphCell, GlyphGrid, Rgb};
pub use schedule::{CallbackId, FrameLoop, Tick};
pub use surface::{OverlayId, OverlayStyle, OverlaySurface, Stage, Viewport};
