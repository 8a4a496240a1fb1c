//! Smoothed viewpoint driven by the control vector and the discrete mode.
//!
//! The camera hovers in front of the tree and leans with the hand: the
//! control vector offsets the eye, chaos pulls it back for a wider frame,
//! and a slow idle orbit keeps the scene alive when nobody is signalling.

use crate::state::{ControlVector, Mode};
use glam::{Mat4, Vec3};

const BASE_EYE: Vec3 = Vec3::new(0.0, 4.0, 20.0);
const LOOK_TARGET: Vec3 = Vec3::new(0.0, 4.0, 0.0);

/// How far the control vector swings the eye, in world units per unit input.
const HAND_SWING_X: f32 = 5.0;
const HAND_SWING_Y: f32 = 3.0;
/// Extra camera distance while the tree is scattered.
const CHAOS_PULLBACK: f32 = 5.0;
/// Exponential smoothing rate toward the target eye position.
const SMOOTH_RATE: f32 = 2.0;

/// Eases the eye toward a target derived from the current signal.
#[derive(Debug)]
pub struct ViewDriver {
    eye: Vec3,
    zoom: f32,
}

impl ViewDriver {
    pub fn new() -> Self {
        Self {
            eye: BASE_EYE,
            zoom: 0.0,
        }
    }

    /// Current (smoothed) eye position.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Nudge the camera distance (mouse wheel). Positive zooms in.
    pub fn zoom_by(&mut self, amount: f32) {
        self.zoom = (self.zoom - amount).clamp(-10.0, 15.0);
    }

    /// Advance the eye toward this frame's target.
    pub fn update(&mut self, control: ControlVector, mode: Mode, elapsed: f32, delta: f32) {
        let idle_orbit = (elapsed * 0.1).sin() * 2.0;
        let pullback = match mode {
            Mode::Chaos => CHAOS_PULLBACK,
            Mode::Formed => 0.0,
        };

        let target = Vec3::new(
            BASE_EYE.x + control.x * HAND_SWING_X + idle_orbit,
            BASE_EYE.y + control.y * HAND_SWING_Y,
            BASE_EYE.z + pullback + self.zoom,
        );

        if delta > 0.0 {
            let step = 1.0 - (-SMOOTH_RATE * delta).exp();
            self.eye += (target - self.eye) * step;
        }
    }

    /// View matrix looking at the tree center.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, LOOK_TARGET, Vec3::Y)
    }

    /// Combined view-projection matrix for the given aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(50.0_f32.to_radians(), aspect, 0.1, 200.0);
        proj * self.view_matrix()
    }
}

impl Default for ViewDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_base_eye() {
        let view = ViewDriver::new();
        assert_eq!(view.eye(), BASE_EYE);
    }

    #[test]
    fn test_converges_toward_hand_offset() {
        let mut view = ViewDriver::new();
        let control = ControlVector::new(1.0, -1.0);
        // Idle orbit at elapsed 0 contributes nothing.
        for _ in 0..600 {
            view.update(control, Mode::Formed, 0.0, 1.0 / 60.0);
        }
        let eye = view.eye();
        assert!((eye.x - (BASE_EYE.x + HAND_SWING_X)).abs() < 0.05);
        assert!((eye.y - (BASE_EYE.y - HAND_SWING_Y)).abs() < 0.05);
        assert!((eye.z - BASE_EYE.z).abs() < 0.05);
    }

    #[test]
    fn test_chaos_pulls_back() {
        let mut view = ViewDriver::new();
        for _ in 0..600 {
            view.update(ControlVector::default(), Mode::Chaos, 0.0, 1.0 / 60.0);
        }
        assert!((view.eye().z - (BASE_EYE.z + CHAOS_PULLBACK)).abs() < 0.05);
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let mut view = ViewDriver::new();
        view.update(ControlVector::new(1.0, 1.0), Mode::Chaos, 5.0, 0.0);
        assert_eq!(view.eye(), BASE_EYE);
    }

    #[test]
    fn test_smoothing_never_oscillates() {
        let mut view = ViewDriver::new();
        let control = ControlVector::new(1.0, 0.0);
        let mut last_x = view.eye().x;
        for _ in 0..200 {
            view.update(control, Mode::Formed, 0.0, 1.0 / 30.0);
            let x = view.eye().x;
            assert!(x >= last_x - 1e-6, "eye moved backwards");
            last_x = x;
        }
    }
}
