use glam::{Mat4, Vec3};

use crate::types::SceneUniforms;

/// Standing eye height above the floor
pub const EYE_HEIGHT: f32 = 0.4;
/// Vertical field of view in degrees
pub const FIELD_OF_VIEW: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Bob phase advance in degrees per elapsed millisecond of walking
pub const BOB_RATE: f32 = 0.6;
/// Divisor applied to the bob sine; sets the head-bob amplitude
pub const BOB_DAMPING: f32 = 20.0;

/// Per-millisecond motion rates derived from input each tick
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MotionRates {
    /// Degrees per millisecond
    pub pitch_rate: f32,
    /// Degrees per millisecond
    pub yaw_rate: f32,
    /// World units per millisecond along the view heading
    pub speed: f32,
}

/// First-person camera: position, orientation in degrees, and motion rates
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub rates: MotionRates,
    /// Walking bob angle in degrees
    pub bob_phase: f32,
    last_tick: Option<f64>,
}

impl CameraState {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            pitch: 0.0,
            yaw: 0.0,
            rates: MotionRates::default(),
            bob_phase: 0.0,
            last_tick: None,
        }
    }

    /// Timestamp of the last tick in milliseconds, if any
    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }

    /// Advance position and orientation to `now_ms`.
    ///
    /// The first call only records the timestamp. Pitch and yaw accumulate
    /// without wrapping or clamping.
    pub fn advance(&mut self, now_ms: f64) {
        let Some(last) = self.last_tick.replace(now_ms) else {
            return;
        };
        let elapsed = (now_ms - last) as f32;

        if self.rates.speed != 0.0 {
            let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
            let distance = self.rates.speed * elapsed;
            self.position.x -= sin_yaw * distance;
            self.position.z -= cos_yaw * distance;

            self.bob_phase += elapsed * BOB_RATE;
            self.position.y = self.bob_phase.to_radians().sin() / BOB_DAMPING + EYE_HEIGHT;
        }

        self.yaw += self.rates.yaw_rate * elapsed;
        self.pitch += self.rates.pitch_rate * elapsed;
    }

    /// World-to-camera transform: rotate by -pitch about X, then by -yaw
    /// about Y, then translate by the negated position
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x((-self.pitch).to_radians())
            * Mat4::from_rotation_y((-self.yaw).to_radians())
            * Mat4::from_translation(-self.position)
    }

    pub fn projection_matrix(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FIELD_OF_VIEW.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn to_uniform(&self, aspect: f32) -> SceneUniforms {
        SceneUniforms::new(Self::projection_matrix(aspect), self.view_matrix())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}
