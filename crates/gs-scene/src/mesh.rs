use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Maillage triangulé indexé, normales par sommet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions, local space.
    pub positions: Vec<Vec3>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Triangles as vertex indices.
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// First index pointing past the vertex arrays, if any.
    #[must_use]
    pub fn invalid_index(&self) -> Option<u32> {
        let len = self.positions.len().min(self.normals.len());
        self.indices
            .iter()
            .flatten()
            .copied()
            .find(|&i| i as usize >= len)
    }

    /// Noeud torique (p, q) autour de l'axe Z.
    ///
    /// `tubular_segments` along the curve, `radial_segments` around the tube.
    ///
    /// # Example
    /// ```
    /// use gs_scene::mesh::Mesh;
    /// let knot = Mesh::torus_knot(1.0, 0.2, 64, 8, 2, 3);
    /// assert_eq!(knot.positions.len(), 65 * 9);
    /// assert_eq!(knot.triangle_count(), 64 * 8 * 2);
    /// assert!(knot.invalid_index().is_none());
    /// ```
    #[must_use]
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    ) -> Self {
        let tubular_segments = tubular_segments.max(3);
        let radial_segments = radial_segments.max(3);
        let (pf, qf) = (p.max(1) as f32, q as f32);
        let curve = |u: f32| {
            let qu = qf / pf * u;
            let cs = qu.cos();
            Vec3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * qu.sin() * 0.5,
            )
        };

        let mut mesh = Self::default();
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * pf * TAU;
            let p1 = curve(u);
            let p2 = curve(u + 0.01);
            // Repère de Frenet approché le long de la courbe.
            let t = p2 - p1;
            let b = t.cross(p2 + p1).normalize_or_zero();
            let n = b.cross(t).normalize_or_zero();
            for j in 0..=radial_segments {
                let v = j as f32 / radial_segments as f32 * TAU;
                let offset = -tube * v.cos() * n + tube * v.sin() * b;
                mesh.positions.push(p1 + offset);
                mesh.normals.push(offset.normalize_or_zero());
            }
        }
        mesh.indices = grid_indices(tubular_segments, radial_segments);
        mesh
    }

    /// Sphère UV centrée sur l'origine.
    ///
    /// # Example
    /// ```
    /// use gs_scene::mesh::Mesh;
    /// let sphere = Mesh::uv_sphere(1.0, 16, 8);
    /// assert!(sphere.positions.iter().all(|p| (p.length() - 1.0).abs() < 1e-4));
    /// ```
    #[must_use]
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut mesh = Self::default();
        for iy in 0..=height_segments {
            let theta = iy as f32 / height_segments as f32 * PI;
            for ix in 0..=width_segments {
                let phi = ix as f32 / width_segments as f32 * TAU;
                let n = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                mesh.positions.push(n * radius);
                mesh.normals.push(n);
            }
        }
        mesh.indices = grid_indices(height_segments, width_segments);
        mesh
    }

    /// Cube centré, normales plates (24 sommets).
    ///
    /// # Example
    /// ```
    /// use gs_scene::mesh::Mesh;
    /// let cube = Mesh::cube(2.0);
    /// assert_eq!(cube.positions.len(), 24);
    /// assert_eq!(cube.triangle_count(), 12);
    /// ```
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut mesh = Self::default();
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for sign in [1.0f32, -1.0] {
                let n = axis * sign;
                // Two tangents spanning the face.
                let u = if axis == Vec3::Y { Vec3::X } else { Vec3::Y };
                let v = n.cross(u);
                let base = mesh.positions.len() as u32;
                for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                    mesh.positions.push((n + u * a + v * b) * h);
                    mesh.normals.push(n);
                }
                mesh.indices.push([base, base + 1, base + 2]);
                mesh.indices.push([base, base + 2, base + 3]);
            }
        }
        mesh
    }
}

/// Triangles of a (rows+1) × (cols+1) vertex grid.
fn grid_indices(rows: u32, cols: u32) -> Vec<[u32; 3]> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 2) as usize);
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.push([a, b, d]);
            indices.push([b, c, d]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knot_normals_are_unit_length() {
        let knot = Mesh::torus_knot(1.0, 0.2, 32, 6, 2, 3);
        assert!(knot.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-3));
    }

    #[test]
    fn knot_stays_within_its_bounds() {
        let knot = Mesh::torus_knot(1.0, 0.2, 64, 8, 2, 3);
        // (2 + 1) * 0.5 * radius + tube
        assert!(knot.positions.iter().all(|p| p.length() <= 1.5 + 0.2 + 1e-3));
    }

    #[test]
    fn invalid_index_is_reported() {
        let mut cube = Mesh::cube(1.0);
        cube.indices.push([0, 1, 99]);
        assert_eq!(cube.invalid_index(), Some(99));
    }

    #[test]
    fn cube_normals_point_outwards() {
        let cube = Mesh::cube(2.0);
        for (p, n) in cube.positions.iter().zip(&cube.normals) {
            assert!((p.dot(*n) - 1.0).abs() < 1e-5);
        }
    }
}
