//! Smoothed blend factor between the formed and scattered endpoints.
//!
//! Each population owns one [`BlendState`]. The discrete mode only ever sets
//! the target to 0 or 1; the visible transition comes from the factor
//! easing toward that target a little every frame.

use crate::state::Mode;

/// Scalar blend factor in `[0, 1]` easing toward a binary target.
///
/// 0 means fully formed, 1 means fully scattered. The factor approaches the
/// target monotonically and never leaves the unit interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    current: f32,
    target: f32,
}

impl BlendState {
    /// Start fully formed.
    pub fn new() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
        }
    }

    /// Current blend factor.
    #[inline]
    pub fn factor(&self) -> f32 {
        self.current
    }

    /// Current target (0.0 or 1.0).
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget from the discrete mode: chaos pulls toward 1, formed toward 0.
    #[inline]
    pub fn set_target(&mut self, mode: Mode) {
        self.target = match mode {
            Mode::Formed => 0.0,
            Mode::Chaos => 1.0,
        };
    }

    /// Pin the factor directly. Used by tests and snap-to-endpoint paths.
    #[inline]
    pub fn set_factor(&mut self, factor: f32) {
        self.current = factor.clamp(0.0, 1.0);
    }

    /// Ease the factor toward the target with exponential smoothing.
    ///
    /// `current += (target - current) * (1 - exp(-rate * delta))` is
    /// frame-rate independent: two half-steps land exactly where one full
    /// step does. Non-positive deltas leave the factor untouched. Returns
    /// the new factor.
    pub fn advance(&mut self, delta: f32, rate: f32) -> f32 {
        if delta > 0.0 {
            let step = 1.0 - (-rate * delta).exp();
            self.current += (self.target - self.current) * step;
            self.current = self.current.clamp(0.0, 1.0);
        }
        self.current
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_formed() {
        let blend = BlendState::new();
        assert_eq!(blend.factor(), 0.0);
        assert_eq!(blend.target(), 0.0);
    }

    #[test]
    fn test_advance_is_monotonic_toward_target() {
        let mut blend = BlendState::new();
        blend.set_target(Mode::Chaos);

        let mut last = blend.factor();
        for _ in 0..500 {
            let next = blend.advance(1.0 / 60.0, 2.0);
            assert!(next >= last);
            assert!((0.0..=1.0).contains(&next));
            last = next;
        }
        assert!(last > 0.99);
    }

    #[test]
    fn test_never_overshoots_under_target_flips() {
        let mut blend = BlendState::new();
        let deltas = [0.001, 0.016, 0.3, 2.0, 0.0, 10.0];
        for (i, delta) in deltas.iter().cycle().take(200).enumerate() {
            let mode = if i % 7 < 3 { Mode::Chaos } else { Mode::Formed };
            blend.set_target(mode);
            let f = blend.advance(*delta, 2.0);
            assert!((0.0..=1.0).contains(&f), "factor {f} escaped unit range");
        }
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut blend = BlendState::new();
        blend.set_target(Mode::Chaos);
        blend.advance(0.5, 2.0);
        let before = blend.factor();
        blend.advance(0.0, 2.0);
        assert_eq!(blend.factor(), before);
        blend.advance(-1.0, 2.0);
        assert_eq!(blend.factor(), before);
    }

    #[test]
    fn test_frame_rate_independence() {
        let mut coarse = BlendState::new();
        coarse.set_target(Mode::Chaos);
        coarse.advance(0.2, 2.0);

        let mut fine = BlendState::new();
        fine.set_target(Mode::Chaos);
        fine.advance(0.1, 2.0);
        fine.advance(0.1, 2.0);

        assert!((coarse.factor() - fine.factor()).abs() < 1e-5);
    }

    #[test]
    fn test_set_factor_clamps() {
        let mut blend = BlendState::new();
        blend.set_factor(3.0);
        assert_eq!(blend.factor(), 1.0);
        blend.set_factor(-3.0);
        assert_eq!(blend.factor(), 0.0);
    }
}
