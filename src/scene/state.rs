use super::model::Model;

/// Holds the single model once it has loaded
///
/// Handlers borrow this per event; nothing else keeps a reference to the
/// model between events.
#[derive(Debug, Default)]
pub struct SceneState {
    model: Option<Model>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the loaded model; a second load replaces the first
    pub fn install(&mut self, model: Model) {
        if self.model.is_some() {
            log::warn!("Replacing an already loaded model");
        }
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::MeshData;
    use crate::scene::ParticleSystem;
    use glam::Vec3;

    #[test]
    fn empty_until_installed() {
        let mut scene = SceneState::new();
        assert!(!scene.has_model());
        assert!(scene.model_mut().is_none());

        let mesh = MeshData::from_triangles(&[[Vec3::ZERO, Vec3::X, Vec3::Y]]);
        scene.install(Model::new(mesh, ParticleSystem::with_seed(3, 0)).unwrap());
        assert!(scene.has_model());
        assert_eq!(scene.model().map(|m| m.particles.len()), Some(3));
    }
}
