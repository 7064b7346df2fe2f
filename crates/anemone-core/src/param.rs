//! One-pole parameter smoothing.
//!
//! Raw parameter values jump whenever the host or the LFO changes them.
//! Feeding those jumps straight into the delay time or the mix produces
//! clicks, so every control value the engine uses goes through a
//! [`SmoothedParam`] first.
//!
//! ## Update Rule
//!
//! ```text
//! current = current - coeff * (current - target)
//! ```
//!
//! A first-order IIR with its pole at `1 - coeff`. `coeff = 1` follows the
//! target instantly; small coefficients slew slowly.
//!
//! ## Usage
//!
//! ```rust
//! use anemone_core::{SmoothedParam, SMOOTHING_COEFF_FINE};
//!
//! let mut wet = SmoothedParam::new(0.0, SMOOTHING_COEFF_FINE);
//! for _ in 0..4800 {
//!     wet.advance_towards(1.0);
//! }
//! assert!(wet.get() > 0.99);
//! ```

use libm::{exp, log};

use crate::config::{SMOOTHING_COEFF_FINE, SMOOTHING_COEFF_GENERIC};

/// A control value slewed toward its target by a one-pole lowpass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f64,
    /// Target value we're smoothing towards
    target: f64,
    /// Smoothing coefficient (1 = instant, near 0 = very slow)
    coeff: f64,
}

impl SmoothedParam {
    /// Create a smoothed parameter at `initial` with the given coefficient.
    pub const fn new(initial: f64, coeff: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff,
        }
    }

    /// Create with the per-sample [`SMOOTHING_COEFF_FINE`] coefficient.
    pub const fn fine(initial: f64) -> Self {
        Self::new(initial, SMOOTHING_COEFF_FINE)
    }

    /// Create with the per-block [`SMOOTHING_COEFF_GENERIC`] coefficient.
    pub const fn generic(initial: f64) -> Self {
        Self::new(initial, SMOOTHING_COEFF_GENERIC)
    }

    /// Create from a time constant expressed in update steps.
    ///
    /// `coeff = 1 - exp(-1 / steps)`, so after `steps` updates the value has
    /// covered 63.2% of a step change. Zero or negative `steps` means
    /// instant response.
    pub fn from_time_constant(initial: f64, steps: f64) -> Self {
        let coeff = if steps <= 0.0 {
            1.0
        } else {
            1.0 - exp(-1.0 / steps)
        };
        Self::new(initial, coeff)
    }

    /// Set the target value without advancing.
    #[inline]
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Set target and current together (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f64) {
        self.target = value;
        self.current = value;
    }

    /// Advance one step toward the stored target and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f64 {
        self.current = self.current - self.coeff * (self.current - self.target);
        self.current
    }

    /// Replace the target and advance one step toward it.
    #[inline]
    pub fn advance_towards(&mut self, target: f64) -> f64 {
        self.target = target;
        self.advance()
    }

    /// Clamp the current value into `[min, max]` and return it.
    ///
    /// Only the smoother's state is touched; the target is left alone so
    /// the next step starts from the clamped value.
    #[inline]
    pub fn clamp_current(&mut self, min: f64, max: f64) -> f64 {
        self.current = self.current.clamp(min, max);
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self) -> f64 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Smoothing coefficient.
    #[inline]
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// Whether the value is within `epsilon` of its target.
    #[inline]
    pub fn is_settled(&self, epsilon: f64) -> bool {
        (self.current - self.target).abs() <= epsilon
    }

    /// Number of steps for a step change to shrink to `ratio` of its size.
    ///
    /// The remaining error after `n` steps is `(1 - coeff)^n`, so this is
    /// `ln(ratio) / ln(1 - coeff)` rounded up. Returns 1 for an instant
    /// smoother.
    pub fn steps_to_settle(&self, ratio: f64) -> usize {
        let pole = 1.0 - self.coeff;
        if pole <= 0.0 {
            return 1;
        }
        let steps = log(ratio) / log(pole);
        libm::ceil(steps.max(1.0)) as usize
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::fine(0.0)
    }
}
