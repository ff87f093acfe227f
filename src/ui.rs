use egui::{Align2, RichText};

use crate::catalog::{DEFAULT_MATERIAL, DEFAULT_PARTICLE_COLOR};
use crate::interaction::{InteractionController, UiAction};
use crate::scene::SceneState;

const MARGIN: f32 = 16.0;

/// Draws the menu button and, when open, the settings panel
///
/// Widgets never touch the scene directly; every change comes back as a
/// `UiAction` for the controller to apply after the frame.
pub fn draw_menu(
    ctx: &egui::Context,
    controller: &InteractionController,
    scene: &SceneState,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::Area::new(egui::Id::new("menu_icon"))
        .anchor(Align2::RIGHT_TOP, [-MARGIN, MARGIN])
        .show(ctx, |ui| {
            if ui.button(RichText::new("Menu").size(18.0)).clicked() {
                actions.push(UiAction::ToggleMenu);
            }
        });

    if !controller.menu_open() {
        return actions;
    }

    let model = scene.model();
    let material = model.map_or(DEFAULT_MATERIAL, |m| m.material.as_str());
    let particle_color = model
        .and_then(|m| controller.particle_colors().key_of(&m.particles.color))
        .unwrap_or(DEFAULT_PARTICLE_COLOR);

    egui::Window::new("Material")
        .anchor(Align2::RIGHT_TOP, [-MARGIN, MARGIN + 40.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            for key in controller.materials().keys() {
                if ui.radio(key == material, title_case(key)).clicked() && key != material {
                    actions.push(UiAction::SelectMaterial(key.to_string()));
                }
            }

            ui.separator();

            let mut show_particles = controller.particles_enabled();
            if ui.checkbox(&mut show_particles, "Show particles").changed() {
                actions.push(UiAction::SetParticlesVisible(show_particles));
            }

            ui.label("Particle colour");
            for key in controller.particle_colors().keys() {
                if ui.radio(key == particle_color, title_case(key)).clicked() && key != particle_color
                {
                    actions.push(UiAction::SelectParticleColor(key.to_string()));
                }
            }
        });

    actions
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
