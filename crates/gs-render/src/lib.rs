/// Terminal presentation for glyphstage.
///
/// Writes the stage (base layer and overlays) into a ratatui buffer, renders
/// the default half-block pixel path and tracks FPS.

pub mod canvas;
pub mod fps;
pub mod hud;
pub mod pixel_pass;
