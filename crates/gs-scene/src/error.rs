use thiserror::Error;

/// Errors surfaced by a [`crate::raster::Rasterizer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The rendering context is gone (device lost, surface destroyed).
    #[error("Contexte de rendu perdu")]
    ContextLost,

    /// A mesh references a vertex that does not exist.
    #[error("Mesh '{mesh}' : index de sommet {index} hors limites ({vertices} sommets)")]
    InvalidMesh {
        /// Name of the offending node.
        mesh: String,
        /// Out-of-range index.
        index: u32,
        /// Vertex count of the mesh.
        vertices: usize,
    },
}
