use glam::Vec3;

/// Source lumineuse de la scène. Couleurs linéaires dans [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient {
        /// Light color.
        color: Vec3,
        /// Multiplier.
        intensity: f32,
    },
    /// Omnidirectional light at a position.
    Point {
        /// World position.
        position: Vec3,
        /// Light color.
        color: Vec3,
        /// Multiplier.
        intensity: f32,
    },
    /// Cone of light from `position` towards `target`.
    Spot {
        /// World position.
        position: Vec3,
        /// Point the cone is aimed at.
        target: Vec3,
        /// Half-angle of the cone, radians.
        angle: f32,
        /// Fraction of the cone [0, 1] over which light fades out.
        penumbra: f32,
        /// Light color.
        color: Vec3,
        /// Multiplier.
        intensity: f32,
    },
}

impl Light {
    /// White ambient light.
    #[must_use]
    pub fn ambient(intensity: f32) -> Self {
        Self::Ambient {
            color: Vec3::ONE,
            intensity,
        }
    }

    /// White point light.
    #[must_use]
    pub fn point(position: Vec3) -> Self {
        Self::Point {
            position,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }

    /// White spot light aimed at the origin.
    #[must_use]
    pub fn spot(position: Vec3, angle: f32, penumbra: f32) -> Self {
        Self::Spot {
            position,
            target: Vec3::ZERO,
            angle,
            penumbra: penumbra.clamp(0.0, 1.0),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }

    /// Lumière diffuse (Lambert) reçue au point `p` de normale unitaire `n`.
    ///
    /// # Example
    /// ```
    /// use glam::Vec3;
    /// use gs_scene::light::Light;
    /// let light = Light::point(Vec3::new(0.0, 0.0, 10.0));
    /// let facing = light.irradiance(Vec3::ZERO, Vec3::Z);
    /// let away = light.irradiance(Vec3::ZERO, -Vec3::Z);
    /// assert!((facing.x - 1.0).abs() < 1e-5);
    /// assert_eq!(away, Vec3::ZERO);
    /// ```
    #[must_use]
    pub fn irradiance(&self, p: Vec3, n: Vec3) -> Vec3 {
        match *self {
            Self::Ambient { color, intensity } => color * intensity,
            Self::Point {
                position,
                color,
                intensity,
            } => {
                let l = (position - p).normalize_or_zero();
                color * intensity * n.dot(l).max(0.0)
            }
            Self::Spot {
                position,
                target,
                angle,
                penumbra,
                color,
                intensity,
            } => {
                let l = (position - p).normalize_or_zero();
                let axis = (target - position).normalize_or_zero();
                let cone = spot_falloff(angle, penumbra, (-l).dot(axis));
                color * intensity * cone * n.dot(l).max(0.0)
            }
        }
    }
}

/// Atténuation du cône : 0 hors cône, 1 au coeur, smoothstep dans la pénombre.
fn spot_falloff(angle: f32, penumbra: f32, cos_theta: f32) -> f32 {
    let outer = angle.cos();
    let inner = (angle * (1.0 - penumbra)).cos();
    if inner - outer <= f32::EPSILON {
        return if cos_theta >= outer { 1.0 } else { 0.0 };
    }
    let t = ((cos_theta - outer) / (inner - outer)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_lights_only_inside_cone() {
        let spot = Light::spot(Vec3::new(0.0, 0.0, 10.0), 0.15, 0.0);
        let on_axis = spot.irradiance(Vec3::ZERO, Vec3::Z);
        let outside = spot.irradiance(Vec3::new(5.0, 0.0, 0.0), Vec3::Z);
        assert!(on_axis.x > 0.99);
        assert_eq!(outside, Vec3::ZERO);
    }

    #[test]
    fn penumbra_softens_edge() {
        let soft = Light::spot(Vec3::new(0.0, 0.0, 10.0), 0.3, 1.0);
        // tan(0.2) * 10 ≈ 2.03: inside the cone but away from the core.
        let edge = soft.irradiance(Vec3::new(2.0, 0.0, 0.0), Vec3::Z);
        assert!(edge.x > 0.0 && edge.x < 0.9);
    }

    #[test]
    fn ambient_ignores_normal() {
        let amb = Light::ambient(0.25);
        assert_eq!(amb.irradiance(Vec3::ZERO, -Vec3::Y), Vec3::splat(0.25));
    }
}
