use glam::Mat4;

use crate::assets::Texture2d;

use super::mesh::Mesh;

/// One drawable: mesh reference + base-color texture + model matrix.
///
/// There is no hierarchy; the model matrix is absolute. Both the depth passes
/// (which ignore the texture) and the lit/unlit passes iterate the same list.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub texture: Texture2d,
    pub model: Mat4,
}

/// Flat object list for one demo.
#[derive(Debug, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mesh: Mesh, texture: Texture2d, model: Mat4) {
        self.objects.push(SceneObject {
            mesh,
            texture,
            model,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneObject> {
        self.objects.iter()
    }
}
