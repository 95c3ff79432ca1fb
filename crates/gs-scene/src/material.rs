use glam::Vec3;

use crate::light::Light;

/// Surface appearance of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Diffuse surface lit by the scene's lights.
    Standard {
        /// Albedo, linear [0, 1].
        color: Vec3,
    },
    /// Flat color, ignores lights.
    Unlit {
        /// Output color.
        color: Vec3,
    },
    /// World-space normal mapped to RGB.
    Normal,
}

impl Default for Material {
    fn default() -> Self {
        Self::Standard {
            color: Vec3::splat(0.8),
        }
    }
}

impl Material {
    /// Matériau diffus d'une couleur sRGB 8 bits.
    #[must_use]
    pub fn standard(r: u8, g: u8, b: u8) -> Self {
        Self::Standard {
            color: Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0,
        }
    }

    /// Couleur finale au point `p`, normale `n`, vue depuis `eye`.
    ///
    /// Surfaces are two-sided: the normal is flipped towards the eye.
    ///
    /// # Example
    /// ```
    /// use glam::Vec3;
    /// use gs_scene::{light::Light, material::Material};
    /// let lights = [Light::point(Vec3::new(0.0, 0.0, 10.0))];
    /// let m = Material::standard(255, 255, 255);
    /// let c = m.shade(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), &lights);
    /// assert!((c - Vec3::ONE).length() < 1e-4);
    /// ```
    #[must_use]
    pub fn shade(&self, p: Vec3, n: Vec3, eye: Vec3, lights: &[Light]) -> Vec3 {
        let n = if n.dot(eye - p) < 0.0 { -n } else { n };
        match *self {
            Self::Standard { color } => {
                let received: Vec3 = lights.iter().map(|l| l.irradiance(p, n)).sum();
                (color * received).clamp(Vec3::ZERO, Vec3::ONE)
            }
            Self::Unlit { color } => color,
            Self::Normal => n * 0.5 + Vec3::splat(0.5),
        }
    }
}
