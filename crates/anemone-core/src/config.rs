//! Engine constants and the immutable configuration bundle.
//!
//! The free constants are the reference tuning of the chorus. [`EngineConfig`]
//! groups them so an engine can be built with a different buffer capacity
//! (tests use small rings to exercise wraparound) without touching any
//! process-wide state.

use core::fmt;

/// Ring buffer capacity in samples, shared by the delay line and the LFO.
///
/// Bounds the longest representable delay and the largest block the LFO
/// can render in one call. One second at 192 kHz.
pub const MAX_BUFFER_DELAY_SIZE: usize = 192_000;

/// Slow one-pole coefficient, applied once per block.
pub const SMOOTHING_COEFF_GENERIC: f64 = 0.04;

/// Fast one-pole coefficient, applied once per sample.
pub const SMOOTHING_COEFF_FINE: f64 = 0.002;

/// Delay time at zero modulation, in seconds.
pub const BASE_DELAY_SECONDS: f64 = 0.003;

/// Delay time swing for a full-scale modulation value, in seconds.
pub const MOD_DEPTH_SECONDS: f64 = 0.002;

/// Feedback gain reached when the smoothed feedback amount is 1.0.
pub const MAX_FEEDBACK_GAIN: f64 = 0.99;

/// Soft clip drive reached when the smoothed soft clip amount is 1.0.
pub const MAX_SOFT_CLIP_DRIVE: f64 = 10.0;

/// Value the soft clip smoother is seeded with on reset.
pub const SOFT_CLIP_FLOOR: f64 = 0.001;

/// Immutable configuration for a [`DelayEngine`](crate::DelayEngine) and
/// its companion [`Lfo`](crate::Lfo).
///
/// `Default` yields the reference tuning built from the constants above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Ring buffer capacity in samples.
    pub capacity: usize,
    /// Delay time at zero modulation, in seconds.
    pub base_delay_seconds: f64,
    /// Delay time swing per unit of modulation, in seconds.
    pub mod_depth_seconds: f64,
    /// Per-sample smoothing coefficient (feedback, delay time, wet/dry).
    pub fine_coeff: f64,
    /// Per-block smoothing coefficient (soft clip).
    pub generic_coeff: f64,
    /// Upper end of the feedback gain mapping.
    pub max_feedback_gain: f64,
    /// Upper end of the soft clip drive mapping.
    pub max_soft_clip_drive: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_BUFFER_DELAY_SIZE,
            base_delay_seconds: BASE_DELAY_SECONDS,
            mod_depth_seconds: MOD_DEPTH_SECONDS,
            fine_coeff: SMOOTHING_COEFF_FINE,
            generic_coeff: SMOOTHING_COEFF_GENERIC,
            max_feedback_gain: MAX_FEEDBACK_GAIN,
            max_soft_clip_drive: MAX_SOFT_CLIP_DRIVE,
        }
    }
}

impl EngineConfig {
    /// Smallest ring the interpolated read can work with.
    pub const MIN_CAPACITY: usize = 4;

    /// Returns a copy with a different ring buffer capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Longest delay time the modulation can request, in seconds.
    pub fn max_delay_seconds(&self) -> f64 {
        self.base_delay_seconds + self.mod_depth_seconds
    }

    /// Longest delay the ring can serve, in samples.
    ///
    /// One slot is the write position and one is the second interpolation
    /// tap, so two samples are unavailable.
    pub fn max_delay_samples(&self) -> f64 {
        self.capacity.saturating_sub(2) as f64
    }

    /// Checks the configuration for values that break the engine.
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.capacity < Self::MIN_CAPACITY {
            return Err(ConfigIssue::CapacityTooSmall(self.capacity));
        }
        for coeff in [self.fine_coeff, self.generic_coeff] {
            if coeff.is_nan() || coeff <= 0.0 || coeff > 1.0 {
                return Err(ConfigIssue::SmoothingCoefficient(coeff));
            }
        }
        if !(0.0..1.0).contains(&self.max_feedback_gain) {
            return Err(ConfigIssue::FeedbackGain(self.max_feedback_gain));
        }
        if self.mod_depth_seconds < 0.0 || self.base_delay_seconds < self.mod_depth_seconds {
            return Err(ConfigIssue::NegativeDelay {
                base_seconds: self.base_delay_seconds,
                depth_seconds: self.mod_depth_seconds,
            });
        }
        if self.max_soft_clip_drive.is_nan() || self.max_soft_clip_drive < 0.0 {
            return Err(ConfigIssue::SoftClipDrive(self.max_soft_clip_drive));
        }
        Ok(())
    }

    /// Checks that the longest modulated delay fits in the ring at the
    /// given sample rate.
    pub fn check_sample_rate(&self, sample_rate: f64) -> Result<(), ConfigIssue> {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(ConfigIssue::SampleRate(sample_rate));
        }
        let needed = self.max_delay_seconds() * sample_rate;
        if needed > self.max_delay_samples() {
            return Err(ConfigIssue::DelayExceedsCapacity {
                needed_samples: needed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigIssue {
    /// Ring buffer shorter than [`EngineConfig::MIN_CAPACITY`].
    CapacityTooSmall(usize),
    /// Smoothing coefficient outside `(0, 1]`.
    SmoothingCoefficient(f64),
    /// Feedback gain ceiling outside `[0, 1)`.
    FeedbackGain(f64),
    /// Modulation could drive the delay time below zero.
    NegativeDelay {
        /// Base delay in seconds.
        base_seconds: f64,
        /// Modulation depth in seconds.
        depth_seconds: f64,
    },
    /// Negative or NaN soft clip drive ceiling.
    SoftClipDrive(f64),
    /// Sample rate that is not a positive number.
    SampleRate(f64),
    /// The longest modulated delay does not fit in the ring.
    DelayExceedsCapacity {
        /// Samples the longest delay needs.
        needed_samples: f64,
        /// Ring capacity in samples.
        capacity: usize,
    },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityTooSmall(capacity) => write!(
                f,
                "buffer capacity {capacity} is below the minimum of {}",
                EngineConfig::MIN_CAPACITY
            ),
            Self::SmoothingCoefficient(coeff) => {
                write!(f, "smoothing coefficient {coeff} is outside (0, 1]")
            }
            Self::FeedbackGain(gain) => write!(f, "feedback gain ceiling {gain} is outside [0, 1)"),
            Self::NegativeDelay {
                base_seconds,
                depth_seconds,
            } => write!(
                f,
                "modulation depth {depth_seconds}s exceeds base delay {base_seconds}s"
            ),
            Self::SoftClipDrive(drive) => write!(f, "soft clip drive ceiling {drive} is invalid"),
            Self::SampleRate(rate) => write!(f, "sample rate {rate} is not positive"),
            Self::DelayExceedsCapacity {
                needed_samples,
                capacity,
            } => write!(
                f,
                "delay of {needed_samples:.1} samples does not fit in a {capacity}-sample buffer"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigIssue {}
