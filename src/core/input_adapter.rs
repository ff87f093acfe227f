use winit::event::{MouseScrollDelta, WindowEvent};

/// Pixels scrolled per wheel "line" when the platform reports lines
pub const DEFAULT_LINE_HEIGHT: f32 = 40.0;

/// Converts a wheel delta into document pixels, positive meaning down the page
///
/// Winit reports wheel-down as a negative `y`, browsers as a positive
/// `scrollY` increase, so both delta kinds are negated here.
pub fn wheel_to_pixels(delta: MouseScrollDelta, line_height: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines * line_height,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

/// Adapter that turns winit wheel events into page scroll distances
#[derive(Debug, Clone)]
pub struct WinitScrollAdapter {
    line_height: f32,
    /// Scroll distance accumulated since the last `take_scroll`
    pending: f32,
}

impl WinitScrollAdapter {
    pub fn new(line_height: f32) -> Self {
        Self {
            line_height,
            pending: 0.0,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Returns true when the event was a wheel event
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseWheel { delta, .. } => {
                self.push(*delta);
                true
            }
            _ => false,
        }
    }

    pub fn push(&mut self, delta: MouseScrollDelta) {
        self.pending += wheel_to_pixels(delta, self.line_height);
    }

    /// Drains the accumulated distance
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.pending)
    }
}

impl Default for WinitScrollAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    // Winit events carry a DeviceId that can't be built safely in tests,
    // so these go through `push` with bare deltas.

    #[test]
    fn test_wheel_down_scrolls_down() {
        let dy = wheel_to_pixels(MouseScrollDelta::LineDelta(0.0, -1.0), 40.0);
        assert_eq!(dy, 40.0);
    }

    #[test]
    fn test_pixel_delta_passes_through() {
        let dy = wheel_to_pixels(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.5)),
            40.0,
        );
        assert_eq!(dy, -12.5);
    }

    #[test]
    fn test_accumulates_until_taken() {
        let mut adapter = WinitScrollAdapter::new(20.0);
        adapter.push(MouseScrollDelta::LineDelta(0.0, -2.0));
        adapter.push(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert_eq!(adapter.take_scroll(), 20.0);
        assert_eq!(adapter.take_scroll(), 0.0);
    }

    #[test]
    fn test_default_line_height() {
        let adapter = WinitScrollAdapter::default();
        assert_eq!(adapter.line_height(), DEFAULT_LINE_HEIGHT);
    }
}
