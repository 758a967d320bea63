use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Mouse button that grabs and releases the cursor for mouse-look.
pub const CAPTURE_BUTTON: MouseButton = MouseButton::Right;

/// Half-height of the orthographic view when switching projection with `P`.
pub const ORTHO_HEIGHT: f32 = 2.0;

/// One-shot commands bound to key presses. Movement keys are not actions; they
/// are held state and go straight to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ResetCamera,
    ToggleWireframe,
    ToggleProjection,
}

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Escape => Some(Action::Quit),
        KeyCode::KeyR => Some(Action::ResetCamera),
        KeyCode::Digit1 => Some(Action::ToggleWireframe),
        KeyCode::KeyP => Some(Action::ToggleProjection),
        _ => None,
    }
}

/// Tracks whether mouse motion drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseCapture {
    captured: bool,
}

impl Default for MouseCapture {
    /// Starts captured.
    fn default() -> Self {
        Self { captured: true }
    }
}

impl MouseCapture {
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.captured = !self.captured;
        self.captured
    }
}
