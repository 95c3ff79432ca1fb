/// Scene graph and software rasterization for glyphstage.

pub mod camera;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod raster;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use error::RasterError;
pub use light::Light;
pub use material::Material;
pub use mesh::Mesh;
pub use raster::{Rasterizer, SoftwareRasterizer};
pub use scene::{DrawItem, Node, Scene};
pub use transform::Transform;
