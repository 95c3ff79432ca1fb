use glam::Mat4;
use gs_core::frame::Rgb;

use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Noeud du graphe de scène : un groupe, un mesh, ou les deux.
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Nom, utilisé par [`Scene::find_mut`].
    pub name: String,
    /// Local transform relative to the parent.
    pub transform: Transform,
    /// Geometry drawn at this node.
    pub mesh: Option<Mesh>,
    /// Material for `mesh`.
    pub material: Material,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Empty group.
    #[must_use]
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Node drawing `mesh` with `material`.
    #[must_use]
    pub fn mesh(name: &str, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.to_string(),
            mesh: Some(mesh),
            material,
            ..Self::default()
        }
    }

    /// Same node with another local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Same node with one more child.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    fn collect<'a>(&'a self, parent: Mat4, out: &mut Vec<DrawItem<'a>>) {
        let world = parent * self.transform.matrix();
        if let Some(mesh) = &self.mesh {
            out.push(DrawItem {
                name: &self.name,
                mesh,
                material: &self.material,
                world,
            });
        }
        for child in &self.children {
            child.collect(world, out);
        }
    }
}

/// Un mesh à dessiner avec sa transformation monde.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    /// Node name.
    pub name: &'a str,
    /// Geometry.
    pub mesh: &'a Mesh,
    /// Material.
    pub material: &'a Material,
    /// Local → world matrix.
    pub world: Mat4,
}

/// Graphe de scène : fond, lumières et noeuds racines.
///
/// # Example
/// ```
/// use gs_scene::{material::Material, mesh::Mesh, scene::{Node, Scene}};
/// let mut scene = Scene::new(Some((0, 0, 0)));
/// scene.add(Node::group("model").with_child(Node::mesh("cube", Mesh::cube(1.0), Material::default())));
/// assert_eq!(scene.draw_list().len(), 1);
/// assert!(scene.find_mut("cube").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Clear color; `None` leaves empty pixels transparent.
    pub background: Option<Rgb>,
    /// Lights.
    pub lights: Vec<Light>,
    /// Root nodes.
    pub nodes: Vec<Node>,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new(background: Option<Rgb>) -> Self {
        Self {
            background,
            lights: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Add a root node.
    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Depth-first search by name.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find_map(|n| n.find_mut(name))
    }

    /// Every mesh with its world matrix, parents first.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.collect(Mat4::IDENTITY, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn world_matrix_composes_parent_transforms() {
        let mut scene = Scene::default();
        scene.add(
            Node::group("parent")
                .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_scale(2.0))
                .with_child(
                    Node::mesh("child", Mesh::cube(1.0), Material::default())
                        .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0))),
                ),
        );
        let items = scene.draw_list();
        assert_eq!(items.len(), 1);
        let origin = items[0].world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn find_mut_reaches_nested_nodes() {
        let mut scene = Scene::default();
        scene.add(Node::group("a").with_child(Node::group("b").with_child(Node::group("c"))));
        scene.find_mut("c").unwrap().transform.position.x = 3.0;
        assert!(scene.find_mut("missing").is_none());
        assert_eq!(scene.nodes[0].children[0].children[0].transform.position.x, 3.0);
    }
}
