//! Scène de démonstration et animations du modèle.

use glam::Vec3;
use gs_core::config::ModelKind;
use gs_scene::{Light, Material, Mesh, Node, Scene, Transform};

/// Name of the animated node.
pub const MODEL_NODE: &str = "model";

/// Orange du modèle.
const MODEL_COLOR: (u8, u8, u8) = (255, 140, 60);

/// Fond noir, spot en (10, 10, 10), point en (-10, -10, -10), un modèle.
#[must_use]
pub fn build_scene(model: ModelKind) -> Scene {
    let mut scene = Scene::new(Some((0, 0, 0)));
    scene.add_light(Light::spot(Vec3::splat(10.0), 0.15, 1.0));
    scene.add_light(Light::point(Vec3::splat(-10.0)));
    scene.add(model_node(model));
    scene
}

/// The model node for `model`, at the origin.
#[must_use]
pub fn model_node(model: ModelKind) -> Node {
    let mesh = match model {
        ModelKind::TorusKnot => Mesh::torus_knot(1.0, 0.2, 128, 32, 2, 3),
        ModelKind::Sphere => Mesh::uv_sphere(1.2, 48, 24),
        ModelKind::Cube => Mesh::cube(1.5),
    };
    let (r, g, b) = MODEL_COLOR;
    Node::mesh(MODEL_NODE, mesh, Material::standard(r, g, b))
}

/// Swap the model geometry, keeping its current transform.
pub fn replace_model(scene: &mut Scene, model: ModelKind) {
    if let Some(node) = scene.find_mut(MODEL_NODE) {
        let transform = node.transform;
        *node = model_node(model).with_transform(transform);
        log::debug!("Modèle remplacé : {model:?}");
    }
}

/// Rotation continue : delta / 2 radians sur X et Y.
pub fn spin(transform: &mut Transform, delta: f32) {
    transform.rotation.x += delta / 2.0;
    transform.rotation.y += delta / 2.0;
}

/// Balancement lent et flottement vertical, fonction du temps écoulé `t`.
pub fn float(transform: &mut Transform, t: f32) {
    transform.rotation.x = -std::f32::consts::PI / 1.75 + (t / 4.0).cos() / 8.0;
    transform.rotation.y = (t / 4.0).sin() / 8.0;
    transform.rotation.z = (1.0 + (t / 1.5).sin()) / 20.0;
    transform.position.y = (1.0 + (t / 1.5).sin()) / 10.0;
}
