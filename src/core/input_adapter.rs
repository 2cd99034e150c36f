use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Adapter that bridges Winit keyboard events to the Controller trait.
/// Holds the set of keys currently down; keys with no [`Button`] are ignored.
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(keycode) = event.physical_key {
                self.process_key(keycode, event.state);
            }
        }
    }

    /// Apply a key-down or key-up for a physical key
    pub fn process_key(&mut self, keycode: KeyCode, state: ElementState) {
        let Some(button) = Self::keycode_to_button(keycode) else {
            return;
        };

        match state {
            ElementState::Pressed => self.press(button),
            ElementState::Released => self.release(button),
        }
    }

    pub fn press(&mut self, button: Button) {
        if self.pressed_keys.insert(button) {
            self.pressed_vec.push(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        if self.pressed_keys.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    /// Forget every held key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.pressed_vec.clear();
    }

    /// Map Winit KeyCode to Button
    pub fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::PageUp => Some(Button::PageUp),
            KeyCode::PageDown => Some(Button::PageDown),
            KeyCode::ArrowLeft => Some(Button::ArrowLeft),
            KeyCode::ArrowRight => Some(Button::ArrowRight),
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
