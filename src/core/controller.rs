/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    PageUp,
    PageDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Escape,
}

impl Button {
    pub const ALL: [Button; 11] = [
        Button::PageUp,
        Button::PageDown,
        Button::ArrowLeft,
        Button::ArrowRight,
        Button::ArrowUp,
        Button::ArrowDown,
        Button::KeyW,
        Button::KeyA,
        Button::KeyS,
        Button::KeyD,
        Button::Escape,
    ];
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// True if any of the buttons is down
    fn any_down(&self, buttons: &[Button]) -> bool {
        buttons.iter().any(|&button| self.is_down(button))
    }
}
