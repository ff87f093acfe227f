use crate::catalog::{MaterialCatalog, ParticleColorCatalog};
use crate::scene::SceneState;

/// A change made in the menu overlay
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ToggleMenu,
    SelectMaterial(String),
    SetParticlesVisible(bool),
    SelectParticleColor(String),
}

/// Applies menu input to the scene
///
/// Each handler touches only its own piece of state. Selections naming an
/// unknown catalog key, or arriving before the model has loaded, are ignored.
pub struct InteractionController {
    materials: MaterialCatalog,
    particle_colors: ParticleColorCatalog,
    menu_open: bool,
    particles_enabled: bool,
}

impl InteractionController {
    pub fn new(materials: MaterialCatalog, particle_colors: ParticleColorCatalog) -> Self {
        Self {
            materials,
            particle_colors,
            menu_open: false,
            particles_enabled: true,
        }
    }

    pub fn materials(&self) -> &MaterialCatalog {
        &self.materials
    }

    pub fn particle_colors(&self) -> &ParticleColorCatalog {
        &self.particle_colors
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// State of the "show particles" checkbox
    pub fn particles_enabled(&self) -> bool {
        self.particles_enabled
    }

    pub fn apply(&mut self, scene: &mut SceneState, action: UiAction) {
        match action {
            UiAction::ToggleMenu => self.toggle_menu(),
            UiAction::SelectMaterial(key) => {
                self.select_material(scene, &key);
            }
            UiAction::SetParticlesVisible(checked) => self.set_particles_visible(scene, checked),
            UiAction::SelectParticleColor(key) => {
                self.select_particle_color(scene, &key);
            }
        }
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        log::info!(
            "Menu toggled: {}",
            if self.menu_open { "Shown" } else { "Hidden" }
        );
    }

    /// Swaps the model's material immediately; returns whether it changed
    pub fn select_material(&self, scene: &mut SceneState, key: &str) -> bool {
        let Some(model) = scene.model_mut() else {
            return false;
        };
        if !self.materials.contains(key) {
            log::debug!("Ignoring unknown material {key:?}");
            return false;
        }

        model.material = key.to_string();
        log::info!("Material changed to: {key}");
        true
    }

    /// Unchecking hides the particles at once. Checking only re-enables the
    /// scroll-driven fade; opacity comes back on the next scroll event.
    pub fn set_particles_visible(&mut self, scene: &mut SceneState, checked: bool) {
        self.particles_enabled = checked;

        if let Some(model) = scene.model_mut() {
            if !checked {
                model.particles.opacity = 0.0;
            }
            log::info!(
                "Particles visibility: {}",
                if checked { "Scroll-based" } else { "Hidden" }
            );
        }
    }

    pub fn select_particle_color(&self, scene: &mut SceneState, key: &str) -> bool {
        let Some(model) = scene.model_mut() else {
            return false;
        };
        let Some(color) = self.particle_colors.get(key) else {
            log::debug!("Ignoring unknown particle colour {key:?}");
            return false;
        };

        model.particles.color = *color;
        log::info!("Particle color changed to: {key}");
        true
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(MaterialCatalog::standard(), ParticleColorCatalog::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::MeshData;
    use crate::scene::{Model, ParticleSystem};
    use glam::Vec3;

    fn loaded_scene() -> SceneState {
        let mut scene = SceneState::new();
        let mesh = MeshData::from_triangles(&[[Vec3::ZERO, Vec3::X * 4.0, Vec3::Y * 4.0]]);
        scene.install(Model::new(mesh, ParticleSystem::with_seed(8, 5)).unwrap());
        scene
    }

    #[test]
    fn menu_toggles() {
        let mut controller = InteractionController::default();
        assert!(!controller.menu_open());
        controller.apply(&mut SceneState::new(), UiAction::ToggleMenu);
        assert!(controller.menu_open());
        controller.toggle_menu();
        assert!(!controller.menu_open());
    }

    #[test]
    fn material_swap() {
        let controller = InteractionController::default();
        let mut scene = loaded_scene();
        assert!(controller.select_material(&mut scene, "gold"));
        assert_eq!(scene.model().unwrap().material, "gold");
    }

    #[test]
    fn unknown_material_keeps_current() {
        let controller = InteractionController::default();
        let mut scene = loaded_scene();
        controller.select_material(&mut scene, "wood");
        assert!(!controller.select_material(&mut scene, "granite"));
        assert_eq!(scene.model().unwrap().material, "wood");
    }

    #[test]
    fn material_before_load_is_ignored() {
        let controller = InteractionController::default();
        let mut scene = SceneState::new();
        assert!(!controller.select_material(&mut scene, "gold"));
    }

    #[test]
    fn unchecking_hides_particles_immediately() {
        let mut controller = InteractionController::default();
        let mut scene = loaded_scene();
        scene.model_mut().unwrap().particles.opacity = 0.7;

        controller.apply(&mut scene, UiAction::SetParticlesVisible(false));
        assert!(!controller.particles_enabled());
        assert_eq!(scene.model().unwrap().particles.opacity, 0.0);
    }

    #[test]
    fn rechecking_waits_for_scroll() {
        let mut controller = InteractionController::default();
        let mut scene = loaded_scene();
        controller.set_particles_visible(&mut scene, false);
        controller.set_particles_visible(&mut scene, true);
        assert!(controller.particles_enabled());
        assert_eq!(scene.model().unwrap().particles.opacity, 0.0);
    }

    #[test]
    fn particle_color_swap() {
        let controller = InteractionController::default();
        let mut scene = loaded_scene();
        assert!(controller.select_particle_color(&mut scene, "red"));
        assert_eq!(scene.model().unwrap().particles.color, [1.0, 0.0, 0.0]);
        assert!(!controller.select_particle_color(&mut scene, "mauve"));
        assert_eq!(scene.model().unwrap().particles.color, [1.0, 0.0, 0.0]);
    }
}
