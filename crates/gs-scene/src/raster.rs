use glam::{Mat3, Vec2, Vec3, Vec4};
use gs_core::frame::FrameBuffer;

use crate::camera::Camera;
use crate::error::RasterError;
use crate::scene::Scene;

/// Rasterise une scène vue d'une caméra dans un buffer RGBA.
///
/// Implémenté par : [`SoftwareRasterizer`]. Un backend GPU signalerait la
/// perte de contexte via [`RasterError::ContextLost`].
pub trait Rasterizer {
    /// Draw `scene` from `camera` into `target`.
    ///
    /// `pixel_aspect` is the height / width ratio of one target pixel, so
    /// the projection can undo non-square pixels (glyph cells).
    ///
    /// # Errors
    /// Returns a [`RasterError`] when the scene cannot be drawn.
    fn rasterize(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        pixel_aspect: f32,
        target: &mut FrameBuffer,
    ) -> Result<(), RasterError>;
}

/// Sommet après transformation : position écran, profondeur, 1/w et couleur.
#[derive(Clone, Copy)]
struct ScreenVertex {
    xy: Vec2,
    z: f32,
    inv_w: f32,
    color: Vec3,
}

/// Rasteriseur logiciel : z-buffer, remplissage par demi-plans, éclairage
/// par sommet interpolé en perspective.
///
/// # Example
/// ```
/// use gs_core::frame::FrameBuffer;
/// use gs_scene::{camera::Camera, raster::{Rasterizer, SoftwareRasterizer}, scene::Scene};
///
/// let mut raster = SoftwareRasterizer::new();
/// let mut target = FrameBuffer::new(8, 4);
/// let scene = Scene::new(Some((0, 0, 0)));
/// raster.rasterize(&scene, &Camera::default(), 2.0, &mut target).unwrap();
/// assert_eq!(target.pixel(3, 2), (0, 0, 0, 255));
/// ```
#[derive(Debug, Default)]
pub struct SoftwareRasterizer {
    depth: Vec<f32>,
    cull_backfaces: bool,
    triangles_drawn: usize,
}

impl SoftwareRasterizer {
    /// Rasteriser with two-sided triangles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip triangles facing away from the camera.
    #[must_use]
    pub fn with_backface_culling(mut self, cull: bool) -> Self {
        self.cull_backfaces = cull;
        self
    }

    /// Triangles that reached the fill stage during the last call.
    #[must_use]
    pub fn triangles_drawn(&self) -> usize {
        self.triangles_drawn
    }

    fn fill_triangle(&mut self, target: &mut FrameBuffer, v: [ScreenVertex; 3]) {
        let area = edge(v[0].xy, v[1].xy, v[2].xy);
        if area.abs() <= f32::EPSILON {
            return;
        }
        // Screen y points down: counter-clockwise in NDC is negative area here.
        if self.cull_backfaces && area > 0.0 {
            return;
        }
        self.triangles_drawn += 1;

        let (w, h) = (target.width as f32, target.height as f32);
        let min = v[0].xy.min(v[1].xy).min(v[2].xy).floor().max(Vec2::ZERO);
        let max = v[0].xy.max(v[1].xy).max(v[2].xy).ceil().min(Vec2::new(w, h));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let stride = target.width as usize;
        for py in min.y as u32..max.y as u32 {
            for px in min.x as u32..max.x as u32 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let b0 = edge(v[1].xy, v[2].xy, p) / area;
                let b1 = edge(v[2].xy, v[0].xy, p) / area;
                let b2 = edge(v[0].xy, v[1].xy, p) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }
                let z = b0 * v[0].z + b1 * v[1].z + b2 * v[2].z;
                let slot = py as usize * stride + px as usize;
                if z >= self.depth[slot] {
                    continue;
                }
                self.depth[slot] = z;

                let (p0, p1, p2) = (b0 * v[0].inv_w, b1 * v[1].inv_w, b2 * v[2].inv_w);
                let color = (v[0].color * p0 + v[1].color * p1 + v[2].color * p2) / (p0 + p1 + p2);
                let rgb = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
                target.put_pixel(px, py, [rgb.x as u8, rgb.y as u8, rgb.z as u8, 255]);
            }
        }
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        pixel_aspect: f32,
        target: &mut FrameBuffer,
    ) -> Result<(), RasterError> {
        self.triangles_drawn = 0;
        if target.is_empty() {
            return Ok(());
        }

        let clear = scene.background.map_or([0, 0, 0, 0], |(r, g, b)| [r, g, b, 255]);
        target.fill(clear);
        let pixels = target.width as usize * target.height as usize;
        if self.depth.len() != pixels {
            self.depth = vec![f32::INFINITY; pixels];
        } else {
            self.depth.fill(f32::INFINITY);
        }

        let (w, h) = (target.width as f32, target.height as f32);
        let aspect = w / (h * pixel_aspect.max(f32::EPSILON));
        let view_proj = camera.projection_matrix(aspect) * camera.view_matrix();

        let items = scene.draw_list();
        let mut screen = Vec::new();
        for item in &items {
            if let Some(index) = item.mesh.invalid_index() {
                return Err(RasterError::InvalidMesh {
                    mesh: item.name.to_string(),
                    index,
                    vertices: item.mesh.positions.len(),
                });
            }

            let normal_matrix = Mat3::from_mat4(item.world).inverse().transpose();
            screen.clear();
            screen.extend(item.mesh.positions.iter().zip(&item.mesh.normals).map(|(p, n)| {
                let world = item.world.transform_point3(*p);
                let normal = (normal_matrix * *n).normalize_or_zero();
                let color = item.material.shade(world, normal, camera.position, &scene.lights);
                let clip = view_proj * world.extend(1.0);
                (clip, color)
            }));

            for tri in &item.mesh.indices {
                let corners = tri.map(|i| screen[i as usize]);
                // Pas de clipping : un triangle qui traverse le plan proche est ignoré.
                if corners.iter().any(|(clip, _)| clip.w <= camera.near) {
                    continue;
                }
                if outside_frustum(corners.map(|(clip, _)| clip)) {
                    continue;
                }
                let verts = corners.map(|(clip, color)| {
                    let inv_w = 1.0 / clip.w;
                    let ndc = clip.truncate() * inv_w;
                    ScreenVertex {
                        xy: Vec2::new((ndc.x * 0.5 + 0.5) * w, (0.5 - ndc.y * 0.5) * h),
                        z: ndc.z,
                        inv_w,
                        color,
                    }
                });
                self.fill_triangle(target, verts);
            }
        }
        log::trace!(
            "{} triangles rasterisés sur {}×{}",
            self.triangles_drawn,
            target.width,
            target.height
        );
        Ok(())
    }
}

/// Signed double area of (a, b, c).
#[inline(always)]
fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// `true` when all three vertices lie beyond the same clip plane.
fn outside_frustum(clip: [Vec4; 3]) -> bool {
    let beyond = |f: fn(Vec4) -> bool| clip.iter().all(|c| f(*c));
    beyond(|c| c.x > c.w)
        || beyond(|c| c.x < -c.w)
        || beyond(|c| c.y > c.w)
        || beyond(|c| c.y < -c.w)
        || beyond(|c| c.z > c.w)
        || beyond(|c| c.z < -c.w)
}
