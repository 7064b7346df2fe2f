//! Chorus parameter snapshots and their cross-thread handoff.
//!
//! The audio thread never sees a parameter change mid-block. A control
//! thread writes values into [`SharedParams`]; the audio thread takes one
//! [`ChorusParams`] snapshot at the top of each block and hands that to the
//! processor.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::engine::DelayParams;

/// One block's worth of chorus parameters.
///
/// | Field | Range | Default |
/// |-------|-------|---------|
/// | `rate_hz` | 0.01–10.0 Hz | 0.8 |
/// | `depth` | 0–1 | 0.5 |
/// | `phase_offset` | 0–1 cycles | 0.25 |
/// | `feedback` | 0–1 | 0.2 |
/// | `feedback_envelope` | -1–1 | 0.0 |
/// | `wet_dry` | 0–1 | 0.5 |
/// | `soft_clip` | 0–1 | 0.0 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParams {
    /// LFO rate in Hz.
    pub rate_hz: f32,
    /// LFO depth; scales how far the delay time swings.
    pub depth: f32,
    /// LFO phase step between adjacent channels, in cycles.
    pub phase_offset: f32,
    /// Base feedback amount.
    pub feedback: f32,
    /// Envelope contribution to the feedback amount. Negative values duck
    /// the feedback on loud input and can push it below zero.
    pub feedback_envelope: f32,
    /// Wet/dry crossfade.
    pub wet_dry: f32,
    /// Soft clip amount.
    pub soft_clip: f32,
}

impl ChorusParams {
    /// Lowest accepted LFO rate.
    pub const MIN_RATE_HZ: f32 = 0.01;
    /// Highest accepted LFO rate.
    pub const MAX_RATE_HZ: f32 = 10.0;

    /// Returns a copy with every field forced into its documented range.
    ///
    /// NaN fields fall back to their defaults.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let fix = |value: f32, fallback: f32, min: f32, max: f32| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(min, max)
            }
        };

        Self {
            rate_hz: fix(
                self.rate_hz,
                defaults.rate_hz,
                Self::MIN_RATE_HZ,
                Self::MAX_RATE_HZ,
            ),
            depth: fix(self.depth, defaults.depth, 0.0, 1.0),
            phase_offset: fix(self.phase_offset, defaults.phase_offset, 0.0, 1.0),
            feedback: fix(self.feedback, defaults.feedback, 0.0, 1.0),
            feedback_envelope: fix(self.feedback_envelope, defaults.feedback_envelope, -1.0, 1.0),
            wet_dry: fix(self.wet_dry, defaults.wet_dry, 0.0, 1.0),
            soft_clip: fix(self.soft_clip, defaults.soft_clip, 0.0, 1.0),
        }
    }

    /// The subset of fields the delay engine consumes.
    pub fn delay_params(&self) -> DelayParams {
        DelayParams {
            feedback: self.feedback,
            feedback_envelope_amount: self.feedback_envelope,
            wet_dry: self.wet_dry,
            soft_clip: self.soft_clip,
        }
    }
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            rate_hz: 0.8,
            depth: 0.5,
            phase_offset: 0.25,
            feedback: 0.2,
            feedback_envelope: 0.0,
            wet_dry: 0.5,
            soft_clip: 0.0,
        }
    }
}

/// Lock-free single-writer/single-reader parameter store.
///
/// Each field is an `f32` stored as its bit pattern in an [`AtomicU32`].
/// Fields are independent: a snapshot taken while a store is in flight may
/// mix old and new values, but every individual value is whole.
///
/// # Example
///
/// ```rust
/// use anemone_core::{ChorusParams, SharedParams};
///
/// let shared = SharedParams::default();
/// shared.store(&ChorusParams { wet_dry: 1.0, ..ChorusParams::default() });
///
/// // Audio thread, once per block:
/// assert_eq!(shared.snapshot().wet_dry, 1.0);
/// ```
#[derive(Debug)]
pub struct SharedParams {
    rate_hz: AtomicU32,
    depth: AtomicU32,
    phase_offset: AtomicU32,
    feedback: AtomicU32,
    feedback_envelope: AtomicU32,
    wet_dry: AtomicU32,
    soft_clip: AtomicU32,
}

#[inline]
fn load(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

#[inline]
fn save(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

impl SharedParams {
    /// Creates a store holding `params`.
    pub fn new(params: &ChorusParams) -> Self {
        Self {
            rate_hz: AtomicU32::new(params.rate_hz.to_bits()),
            depth: AtomicU32::new(params.depth.to_bits()),
            phase_offset: AtomicU32::new(params.phase_offset.to_bits()),
            feedback: AtomicU32::new(params.feedback.to_bits()),
            feedback_envelope: AtomicU32::new(params.feedback_envelope.to_bits()),
            wet_dry: AtomicU32::new(params.wet_dry.to_bits()),
            soft_clip: AtomicU32::new(params.soft_clip.to_bits()),
        }
    }

    /// Publishes a full parameter set (control thread).
    pub fn store(&self, params: &ChorusParams) {
        save(&self.rate_hz, params.rate_hz);
        save(&self.depth, params.depth);
        save(&self.phase_offset, params.phase_offset);
        save(&self.feedback, params.feedback);
        save(&self.feedback_envelope, params.feedback_envelope);
        save(&self.wet_dry, params.wet_dry);
        save(&self.soft_clip, params.soft_clip);
    }

    /// Reads the current parameter set (audio thread).
    pub fn snapshot(&self) -> ChorusParams {
        ChorusParams {
            rate_hz: load(&self.rate_hz),
            depth: load(&self.depth),
            phase_offset: load(&self.phase_offset),
            feedback: load(&self.feedback),
            feedback_envelope: load(&self.feedback_envelope),
            wet_dry: load(&self.wet_dry),
            soft_clip: load(&self.soft_clip),
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(&ChorusParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_limits_every_field() {
        let wild = ChorusParams {
            rate_hz: 100.0,
            depth: -1.0,
            phase_offset: 3.0,
            feedback: 2.0,
            feedback_envelope: -4.0,
            wet_dry: 1.5,
            soft_clip: -0.1,
        };
        let tame = wild.clamped();
        assert_eq!(tame.rate_hz, ChorusParams::MAX_RATE_HZ);
        assert_eq!(tame.depth, 0.0);
        assert_eq!(tame.phase_offset, 1.0);
        assert_eq!(tame.feedback, 1.0);
        assert_eq!(tame.feedback_envelope, -1.0);
        assert_eq!(tame.wet_dry, 1.0);
        assert_eq!(tame.soft_clip, 0.0);
    }

    #[test]
    fn clamped_replaces_nan_with_default() {
        let params = ChorusParams {
            feedback: f32::NAN,
            ..ChorusParams::default()
        };
        assert_eq!(params.clamped().feedback, ChorusParams::default().feedback);
    }

    #[test]
    fn delay_params_carry_engine_fields() {
        let params = ChorusParams {
            feedback: 0.3,
            feedback_envelope: 0.4,
            wet_dry: 0.6,
            soft_clip: 0.7,
            ..ChorusParams::default()
        };
        let delay = params.delay_params();
        assert_eq!(delay.feedback, 0.3);
        assert_eq!(delay.feedback_envelope_amount, 0.4);
        assert_eq!(delay.wet_dry, 0.6);
        assert_eq!(delay.soft_clip, 0.7);
    }

    #[test]
    fn shared_params_snapshot_after_store() {
        let shared = SharedParams::default();
        assert_eq!(shared.snapshot(), ChorusParams::default());

        let params = ChorusParams {
            rate_hz: 3.5,
            feedback_envelope: -0.25,
            ..ChorusParams::default()
        };
        shared.store(&params);
        assert_eq!(shared.snapshot(), params);
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_params_cross_thread() {
        use std::sync::Arc;

        let shared = Arc::new(SharedParams::default());
        let writer = Arc::clone(&shared);
        std::thread::spawn(move || {
            writer.store(&ChorusParams {
                depth: 0.9,
                ..ChorusParams::default()
            });
        })
        .join()
        .unwrap();
        assert_eq!(shared.snapshot().depth, 0.9);
    }
}
