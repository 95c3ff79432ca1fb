use gs_scene::RasterError;
use thiserror::Error;

/// Errors surfaced by [`crate::AsciiCompositor::render`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Le rasteriseur a échoué.
    #[error("Rasterisation impossible : {0}")]
    Raster(#[from] RasterError),

    /// The compositor's overlay is no longer attached to the stage.
    #[error("Overlay ASCII détaché du stage")]
    Detached,
}
