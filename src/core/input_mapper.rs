use super::controller::{Button, Controller};
use crate::camera::MotionRates;

/// Pitch change while Page Up/Down is held, degrees per millisecond
pub const PITCH_RATE: f32 = 0.1;
/// Yaw change while turning, degrees per millisecond
pub const YAW_RATE: f32 = 0.1;
/// Walking speed, world units per millisecond
pub const WALK_SPEED: f32 = 0.003;

const LOOK_UP: &[Button] = &[Button::PageUp];
const LOOK_DOWN: &[Button] = &[Button::PageDown];
const TURN_LEFT: &[Button] = &[Button::ArrowLeft, Button::KeyA];
const TURN_RIGHT: &[Button] = &[Button::ArrowRight, Button::KeyD];
const FORWARD: &[Button] = &[Button::ArrowUp, Button::KeyW];
const BACKWARD: &[Button] = &[Button::ArrowDown, Button::KeyS];

/// Resolve one axis; the positive group wins when both are held
fn axis(controller: &dyn Controller, positive: &[Button], negative: &[Button], rate: f32) -> f32 {
    if controller.any_down(positive) {
        rate
    } else if controller.any_down(negative) {
        -rate
    } else {
        0.0
    }
}

/// Derive all three motion rates from the keys currently held
pub fn map_rates(controller: &dyn Controller) -> MotionRates {
    MotionRates {
        pitch_rate: axis(controller, LOOK_UP, LOOK_DOWN, PITCH_RATE),
        yaw_rate: axis(controller, TURN_LEFT, TURN_RIGHT, YAW_RATE),
        speed: axis(controller, FORWARD, BACKWARD, WALK_SPEED),
    }
}
