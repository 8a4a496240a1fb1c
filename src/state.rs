//! Discrete scene state and the continuous control vector.
//!
//! The scene is always in exactly one of two modes. A classification flips
//! the mode immediately; the smoothing that makes the flip look gradual
//! lives in [`crate::blend`], not here.

use crate::classify::Classification;

/// The two configurations the tree morphs between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Assembled cone shape. Initial state.
    #[default]
    Formed,
    /// Dispersed cloud.
    Chaos,
}

/// Continuous 2D control signal in `[-1, 1]²`, derived from the most recent
/// successful classification. Drives the view, not the mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlVector {
    pub x: f32,
    pub y: f32,
}

impl ControlVector {
    /// Build a control vector, clamping both components to `[-1, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Holds the authoritative [`Mode`] and [`ControlVector`].
#[derive(Debug, Default)]
pub struct StateMachine {
    mode: Mode,
    control: ControlVector,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn control(&self) -> ControlVector {
        self.control
    }

    /// Fold a successful classification into the state.
    ///
    /// The mode changes only when the classified mode differs; the control
    /// vector is refreshed on every call. Returns whether the mode flipped.
    pub fn apply_classification(&mut self, result: &Classification) -> bool {
        let flipped = self.mode != result.mode;
        self.mode = result.mode;
        self.control = ControlVector::new(result.hand_x, result.hand_y);
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chaos(x: f32, y: f32) -> Classification {
        Classification {
            mode: Mode::Chaos,
            hand_x: x,
            hand_y: y,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_initial_state() {
        let machine = StateMachine::new();
        assert_eq!(machine.mode(), Mode::Formed);
        assert_eq!(machine.control(), ControlVector::default());
    }

    #[test]
    fn test_mode_flips_on_change() {
        let mut machine = StateMachine::new();
        assert!(machine.apply_classification(&chaos(0.3, -0.2)));
        assert_eq!(machine.mode(), Mode::Chaos);
    }

    #[test]
    fn test_mode_idempotent_vector_not() {
        let mut machine = StateMachine::new();
        machine.apply_classification(&chaos(0.3, -0.2));
        assert_eq!(machine.control(), ControlVector::new(0.3, -0.2));

        // Same mode again: no flip, but the vector still updates.
        assert!(!machine.apply_classification(&chaos(-0.7, 0.4)));
        assert_eq!(machine.mode(), Mode::Chaos);
        assert_eq!(machine.control(), ControlVector::new(-0.7, 0.4));
    }

    #[test]
    fn test_control_vector_clamps() {
        let v = ControlVector::new(3.0, -8.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, -1.0);
    }
}
