//! Scroll-driven animation.
//!
//! A virtual document taller than the window is scrolled with the mouse
//! wheel. Every scroll event reduces to one progress scalar in `[0, 1]`, and
//! every animated property (model zoom, tilt, spin, particle spread and
//! opacity, background gradient) is a direct linear function of it. There is
//! no smoothing or inertia.

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use std::fmt;

use crate::math::{lerp, srgb_to_linear};
use crate::scene::SceneState;

pub const MIN_SCALE_FACTOR: f32 = 1.0;
pub const MAX_SCALE_FACTOR: f32 = 3.0;
/// Tilt about X at full progress; Z tilts half as far
pub const MAX_TILT: f32 = PI / 8.0;
/// Spin about Y at full progress
pub const MAX_SPIN: f32 = TAU;
/// Extra particle spread at full progress (spread = 1 + this * progress)
pub const MAX_EXTRA_SPREAD: f32 = 2.0;

/// Normalized scroll position
///
/// Degenerate ranges (document no taller than the viewport, or non-finite
/// sizes) yield 0 instead of NaN or infinity, and the result is clamped.
pub fn scroll_progress(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let range = document_height - viewport_height;
    if !range.is_finite() || range <= f32::EPSILON {
        return 0.0;
    }

    let progress = scroll_y / range;
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Scroll position within a virtual page `pages` viewports tall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    scroll_y: f32,
    document_height: f32,
    viewport_height: f32,
    pages: f32,
}

impl ScrollState {
    pub fn new(viewport_height: f32, pages: f32) -> Self {
        let pages = if pages.is_finite() { pages.max(1.0) } else { 1.0 };
        Self {
            scroll_y: 0.0,
            document_height: viewport_height * pages,
            viewport_height,
            pages,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Moves by `dy` pixels (positive scrolls down), clamped to the page.
    /// Returns whether the position changed.
    pub fn scroll_by(&mut self, dy: f32) -> bool {
        self.scroll_to(self.scroll_y + dy)
    }

    pub fn scroll_to(&mut self, y: f32) -> bool {
        let y = if y.is_finite() { y } else { self.scroll_y };
        let clamped = y.clamp(0.0, self.max_scroll());
        let changed = clamped != self.scroll_y;
        self.scroll_y = clamped;
        changed
    }

    /// Keeps the page `pages` viewports tall and re-clamps the position
    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        self.document_height = viewport_height * self.pages;
        self.scroll_to(self.scroll_y);
    }

    pub fn progress(&self) -> f32 {
        scroll_progress(self.scroll_y, self.document_height, self.viewport_height)
    }
}

/// Two-stop vertical gradient behind the scene, channels in sRGB `0..=255`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundGradient {
    pub top: [f32; 3],
    pub bottom: [f32; 3],
}

impl BackgroundGradient {
    /// Deep blue over dark red at the top of the page, shifting towards a
    /// brighter blue and near-black at the bottom
    pub fn at(progress: f32) -> Self {
        Self {
            top: [20.0, 20.0, 50.0 + progress * 50.0],
            bottom: [100.0 - progress * 80.0, 20.0, 20.0],
        }
    }

    pub fn top_linear(&self) -> [f32; 3] {
        self.top.map(|c| srgb_to_linear(c / 255.0))
    }

    pub fn bottom_linear(&self) -> [f32; 3] {
        self.bottom.map(|c| srgb_to_linear(c / 255.0))
    }
}

impl Default for BackgroundGradient {
    fn default() -> Self {
        Self::at(0.0)
    }
}

impl fmt::Display for BackgroundGradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tr, tg, tb] = self.top;
        let [br, bg, bb] = self.bottom;
        write!(
            f,
            "linear-gradient(to bottom, rgb({tr}, {tg}, {tb}), rgb({br}, {bg}, {bb}))"
        )
    }
}

/// Everything derived from one progress value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub progress: f32,
    pub scale_factor: f32,
    pub scale: f32,
    /// Euler XYZ radians
    pub rotation: Vec3,
    pub spread: f32,
    pub opacity: f32,
    pub gradient: BackgroundGradient,
}

impl ScrollFrame {
    pub fn evaluate(progress: f32, base_scale: f32, particles_enabled: bool) -> Self {
        let scale_factor = lerp(MIN_SCALE_FACTOR, MAX_SCALE_FACTOR, progress);
        let tilt = MAX_TILT * progress;

        Self {
            progress,
            scale_factor,
            scale: base_scale * scale_factor,
            rotation: Vec3::new(tilt, MAX_SPIN * progress, tilt * 0.5),
            spread: 1.0 + progress * MAX_EXTRA_SPREAD,
            opacity: if particles_enabled { progress } else { 0.0 },
            gradient: BackgroundGradient::at(progress),
        }
    }
}

/// Applies scroll progress to the loaded model
pub struct ScrollAnimator;

impl ScrollAnimator {
    /// No-op returning `None` until a model is loaded
    pub fn apply(
        scene: &mut SceneState,
        progress: f32,
        particles_enabled: bool,
    ) -> Option<ScrollFrame> {
        let model = scene.model_mut()?;
        let frame = ScrollFrame::evaluate(progress, model.base_scale, particles_enabled);

        model.scale = frame.scale;
        model.rotation = frame.rotation;
        model.particles.set_spread(frame.spread);
        model.particles.opacity = frame.opacity;

        log::debug!(
            "Scroll fraction: {} Scale: {} Scale factor: {} Spin (radians): {} Gradient: {} Particle opacity: {}",
            frame.progress,
            frame.scale,
            frame.scale_factor,
            frame.rotation.y,
            frame.gradient,
            frame.opacity
        );

        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_fraction_of_scrollable_range() {
        assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(2000.0, 3000.0, 1000.0), 1.0);
    }

    #[test]
    fn progress_degenerate_range_is_zero() {
        assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(10.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(10.0, 600.0, 800.0), 0.0);
        assert_eq!(scroll_progress(10.0, f32::INFINITY, 800.0), 0.0);
        assert_eq!(scroll_progress(f32::NAN, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(scroll_progress(5000.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_progress(-50.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn scroll_state_clamps_like_a_page() {
        let mut scroll = ScrollState::new(600.0, 4.0);
        assert_eq!(scroll.document_height(), 2400.0);
        assert_eq!(scroll.max_scroll(), 1800.0);

        assert!(!scroll.scroll_by(-100.0));
        assert!(scroll.scroll_by(900.0));
        assert_eq!(scroll.progress(), 0.5);

        scroll.scroll_by(10_000.0);
        assert_eq!(scroll.scroll_y(), 1800.0);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn resize_keeps_page_count_and_reclamps() {
        let mut scroll = ScrollState::new(600.0, 4.0);
        scroll.scroll_to(1800.0);
        scroll.resize(300.0);
        assert_eq!(scroll.document_height(), 1200.0);
        assert_eq!(scroll.scroll_y(), 900.0);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn single_page_never_scrolls() {
        let mut scroll = ScrollState::new(600.0, 1.0);
        assert!(!scroll.scroll_by(100.0));
        assert_eq!(scroll.progress(), 0.0);
    }

    #[test]
    fn pages_below_one_are_raised() {
        let scroll = ScrollState::new(600.0, 0.25);
        assert_eq!(scroll.document_height(), 600.0);
    }

    #[test]
    fn gradient_endpoints() {
        let start = BackgroundGradient::at(0.0);
        assert_eq!(start.top, [20.0, 20.0, 50.0]);
        assert_eq!(start.bottom, [100.0, 20.0, 20.0]);

        let end = BackgroundGradient::at(1.0);
        assert_eq!(end.top, [20.0, 20.0, 100.0]);
        assert_eq!(end.bottom, [20.0, 20.0, 20.0]);
    }

    #[test]
    fn gradient_formats_as_css() {
        let text = BackgroundGradient::at(0.5).to_string();
        assert_eq!(
            text,
            "linear-gradient(to bottom, rgb(20, 20, 75), rgb(60, 20, 20))"
        );
    }

    #[test]
    fn frame_at_half_progress() {
        let frame = ScrollFrame::evaluate(0.5, 0.5, true);
        assert_eq!(frame.scale_factor, 2.0);
        assert_eq!(frame.scale, 1.0);
        assert!((frame.rotation.y - PI).abs() < 1e-6);
        assert!((frame.rotation.x - PI / 16.0).abs() < 1e-6);
        assert!((frame.rotation.z - PI / 32.0).abs() < 1e-6);
        assert_eq!(frame.spread, 2.0);
        assert_eq!(frame.opacity, 0.5);
    }

    #[test]
    fn hidden_particles_have_zero_opacity() {
        let frame = ScrollFrame::evaluate(0.8, 1.0, false);
        assert_eq!(frame.opacity, 0.0);
    }

    #[test]
    fn apply_without_model_is_noop() {
        let mut scene = SceneState::new();
        assert!(ScrollAnimator::apply(&mut scene, 0.5, true).is_none());
    }
}
