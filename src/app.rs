//! Window-independent application state.
//!
//! `Showcase` receives already-translated events (load results, scroll
//! distances, resizes, menu actions) and keeps the scene, camera and
//! background in step. The winit shell in `main.rs` owns the window and the
//! renderer and forwards into this.

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::interaction::{InteractionController, UiAction};
use crate::loaders::LoadEvent;
use crate::renderer::FrameInputs;
use crate::scene::{Model, ParticleSystem, SceneState};
use crate::scroll::{BackgroundGradient, ScrollAnimator, ScrollFrame, ScrollState};
use crate::types::Lighting;

pub struct Showcase {
    pub scene: SceneState,
    pub camera: Camera,
    pub scroll: ScrollState,
    pub controller: InteractionController,
    pub gradient: BackgroundGradient,
    pub lighting: Lighting,
    particle_count: usize,
    seed: Option<u64>,
}

impl Showcase {
    pub fn new(config: &ViewerConfig, width: u32, height: u32) -> Self {
        Self {
            scene: SceneState::new(),
            camera: Camera::new(width, height),
            scroll: ScrollState::new(height as f32, config.pages),
            controller: InteractionController::default(),
            gradient: BackgroundGradient::default(),
            lighting: Lighting::default(),
            particle_count: config.particles,
            seed: config.seed,
        }
    }

    /// Returns the newly installed model, if this event produced one
    pub fn handle_load_event(&mut self, event: LoadEvent) -> Option<&Model> {
        match event {
            LoadEvent::Progress(progress) => {
                match progress.fraction() {
                    Some(fraction) => log::info!("{:.0}% loaded", fraction * 100.0),
                    None => log::info!("{} bytes loaded", progress.loaded),
                }
                None
            }
            LoadEvent::Loaded(mesh) => match Model::new(mesh, self.spawn_particles()) {
                Ok(model) => {
                    self.scene.install(model);
                    self.camera.frame_model();
                    log::info!("Model loaded successfully");
                    self.scene.model()
                }
                Err(e) => {
                    log::error!("An error happened while loading the model: {e}");
                    None
                }
            },
            LoadEvent::Failed(message) => {
                log::error!("An error happened while loading the model: {message}");
                None
            }
        }
    }

    fn spawn_particles(&self) -> ParticleSystem {
        match self.seed {
            Some(seed) => ParticleSystem::with_seed(self.particle_count, seed),
            None => ParticleSystem::generate(self.particle_count, &mut rand::rng()),
        }
    }

    /// Scrolls the page by `dy` pixels. Like a browser, nothing is animated
    /// when the position does not change.
    pub fn scroll_by(&mut self, dy: f32) -> Option<ScrollFrame> {
        if !self.scroll.scroll_by(dy) {
            return None;
        }
        self.animate()
    }

    fn animate(&mut self) -> Option<ScrollFrame> {
        let frame = ScrollAnimator::apply(
            &mut self.scene,
            self.scroll.progress(),
            self.controller.particles_enabled(),
        )?;
        self.gradient = frame.gradient;
        Some(frame)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        self.scroll.resize(height as f32);
    }

    pub fn apply_actions(&mut self, actions: impl IntoIterator<Item = UiAction>) {
        for action in actions {
            self.controller.apply(&mut self.scene, action);
        }
    }

    pub fn frame_inputs(&self) -> FrameInputs<'_> {
        FrameInputs {
            scene: &self.scene,
            camera: &self.camera,
            gradient: self.gradient,
            materials: self.controller.materials(),
            lighting: self.lighting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{LoadProgress, MeshData};
    use glam::Vec3;

    fn showcase() -> Showcase {
        let config = ViewerConfig {
            particles: 16,
            seed: Some(1),
            ..ViewerConfig::default()
        };
        Showcase::new(&config, 800, 600)
    }

    fn cube_mesh(size: f32) -> MeshData {
        MeshData::from_triangles(&[[Vec3::ZERO, Vec3::new(size, 0.0, 0.0), Vec3::splat(size)]])
    }

    #[test]
    fn progress_installs_nothing() {
        let mut app = showcase();
        let event = LoadEvent::Progress(LoadProgress {
            loaded: 10,
            total: Some(100),
        });
        assert!(app.handle_load_event(event).is_none());
        assert!(!app.scene.has_model());
    }

    #[test]
    fn loaded_mesh_frames_camera() {
        let mut app = showcase();
        let model = app.handle_load_event(LoadEvent::Loaded(cube_mesh(40.0))).unwrap();
        assert_eq!(model.base_scale, 0.5);
        assert_eq!(model.particles.len(), 16);
        assert_eq!(app.camera.position.z, 50.0);
    }

    #[test]
    fn failure_leaves_scene_empty() {
        let mut app = showcase();
        assert!(app
            .handle_load_event(LoadEvent::Failed("no such file".into()))
            .is_none());
        assert!(app.scroll_by(300.0).is_none());
        assert_eq!(app.gradient, BackgroundGradient::default());
    }

    #[test]
    fn scroll_updates_background() {
        let mut app = showcase();
        app.handle_load_event(LoadEvent::Loaded(cube_mesh(4.0)));
        // 3 pages of 600: scrollable range 1200
        let frame = app.scroll_by(600.0).unwrap();
        assert_eq!(frame.progress, 0.5);
        assert_eq!(app.gradient, BackgroundGradient::at(0.5));
    }

    #[test]
    fn scroll_at_top_is_ignored() {
        let mut app = showcase();
        app.handle_load_event(LoadEvent::Loaded(cube_mesh(4.0)));
        assert!(app.scroll_by(-50.0).is_none());
    }

    #[test]
    fn menu_actions_reach_scene() {
        let mut app = showcase();
        app.handle_load_event(LoadEvent::Loaded(cube_mesh(4.0)));
        app.apply_actions([
            UiAction::SelectMaterial("silver".into()),
            UiAction::SelectParticleColor("white".into()),
        ]);
        let model = app.scene.model().unwrap();
        assert_eq!(model.material, "silver");
        assert_eq!(model.particles.color, [1.0, 1.0, 1.0]);
    }
}
