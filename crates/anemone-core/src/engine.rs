//! The modulated feedback delay engine.
//!
//! [`DelayEngine`] is one channel's worth of chorus: a
//! [`FractionalDelayLine`] whose read position is swept by an external
//! modulation signal, with a soft-clipped feedback path whose gain can be
//! pushed around by an external envelope signal.
//!
//! # Per-Sample Flow
//!
//! ```text
//!            ┌──────────── feedback gain (smoothed, ≤ 0.99) ◄── feedback + env·amount
//!            │
//! input ──►(+)──► tanh_clip(drive) ──► ring[write] ···► ring[write - delay] ──┬──► wet
//!   │                                                      ▲                  │
//!   │                                    delay = smoothed(3ms + 2ms·mod)·fs   │
//!   │                                                                          │
//!   └──────────────────────────────── dry ─────────────► crossfade(wet/dry) ◄─┘
//! ```
//!
//! The interpolated read from this sample feeds back on the next sample:
//! the one-sample hold keeps the loop causal.

use crate::config::{EngineConfig, SOFT_CLIP_FLOOR};
use crate::delay::FractionalDelayLine;
use crate::math::{map_range, tanh_clip};
use crate::param::SmoothedParam;

/// Sample rate a freshly built engine reports until it is configured.
pub const UNCONFIGURED_SAMPLE_RATE: f64 = -1.0;

/// Scalar parameter snapshot for one [`DelayEngine::process`] call.
///
/// All amounts are normalized to `[0, 1]` except
/// `feedback_envelope_amount`, which may be negative to duck the feedback
/// as the envelope rises. Pushed past zero, the feedback goes negative and
/// the repeats alternate in polarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayParams {
    /// Base feedback amount.
    pub feedback: f32,
    /// How much the envelope adds to the feedback amount.
    pub feedback_envelope_amount: f32,
    /// Wet/dry crossfade (0 = dry only, 1 = wet only).
    pub wet_dry: f32,
    /// Soft clip amount (0 = transparent, 1 = maximum drive).
    pub soft_clip: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            feedback: 0.0,
            feedback_envelope_amount: 0.0,
            wet_dry: 0.5,
            soft_clip: 0.0,
        }
    }
}

/// Modulated fractional delay with smoothed parameters, feedback and
/// soft clipping.
///
/// # Lifecycle
///
/// 1. Build with [`new`](Self::new) or [`with_config`](Self::with_config);
///    all smoothing state starts at zero.
/// 2. Call [`set_sample_rate`](Self::set_sample_rate) before the first
///    block and whenever the host rate changes.
/// 3. Call [`process`](Self::process) once per block.
/// 4. Call [`reset`](Self::reset) on transport stop/start. Never while
///    `process` is running on another thread.
///
/// # Example
///
/// ```rust
/// use anemone_core::{DelayEngine, DelayParams};
///
/// let mut engine = DelayEngine::new();
/// engine.set_sample_rate(48000.0);
/// engine.reset();
///
/// let input = [0.5f32; 64];
/// let modulation = [0.0f32; 64];
/// let envelope = [0.0f32; 64];
/// let mut output = [0.0f32; 64];
/// engine.process(&input, &DelayParams::default(), &modulation, &envelope, &mut output);
/// ```
#[derive(Debug, Clone)]
pub struct DelayEngine {
    config: EngineConfig,
    sample_rate: f64,
    line: FractionalDelayLine,
    /// Last interpolated read, held one sample as the feedback tap
    feedback_sample: f64,
    time: SmoothedParam,
    wet: SmoothedParam,
    feedback: SmoothedParam,
    soft_clip: SmoothedParam,
}

impl DelayEngine {
    /// Creates an engine with the reference [`EngineConfig`].
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine from an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.capacity` is below 2. Other invalid values are
    /// caught by a debug assertion; see [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid engine config: {:?}",
            config.validate()
        );

        Self {
            config,
            sample_rate: UNCONFIGURED_SAMPLE_RATE,
            line: FractionalDelayLine::new(config.capacity),
            feedback_sample: 0.0,
            time: SmoothedParam::new(0.0, config.fine_coeff),
            wet: SmoothedParam::new(0.0, config.fine_coeff),
            feedback: SmoothedParam::new(0.0, config.fine_coeff),
            soft_clip: SmoothedParam::new(0.0, config.generic_coeff),
        }
    }

    /// Sets the sample rate used to convert delay time to samples.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;

        #[cfg(feature = "tracing")]
        match self.config.check_sample_rate(sample_rate) {
            Ok(()) => tracing::debug!(sample_rate, "delay engine configured"),
            Err(issue) => tracing::warn!(sample_rate, %issue, "delay engine misconfigured"),
        }
    }

    /// Current sample rate, or [`UNCONFIGURED_SAMPLE_RATE`].
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Whether a usable sample rate has been set.
    pub fn is_configured(&self) -> bool {
        self.sample_rate > 0.0
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clears the ring and restarts every smoother.
    ///
    /// Feedback, delay time and wet/dry return to zero. Soft clip is seeded
    /// with [`SOFT_CLIP_FLOOR`] rather than zero.
    pub fn reset(&mut self) {
        self.feedback_sample = 0.0;
        self.time.set_immediate(0.0);
        self.wet.set_immediate(0.0);
        self.feedback.set_immediate(0.0);
        self.soft_clip.set_immediate(SOFT_CLIP_FLOOR);
        self.line.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity = self.line.capacity(), "delay engine reset");
    }

    /// Processes one block.
    ///
    /// The block length is `output.len()`. `input`, `modulation` and
    /// `envelope` must hold at least that many samples.
    ///
    /// # Preconditions
    ///
    /// [`set_sample_rate`](Self::set_sample_rate) must have been called.
    /// Without it the delay time collapses to zero samples (checked by a
    /// debug assertion).
    ///
    /// # Panics
    ///
    /// Panics if any input slice is shorter than `output`.
    pub fn process(
        &mut self,
        input: &[f32],
        params: &DelayParams,
        modulation: &[f32],
        envelope: &[f32],
        output: &mut [f32],
    ) {
        debug_assert!(
            self.is_configured(),
            "DelayEngine::process called before set_sample_rate"
        );
        let len = output.len();
        let input = &input[..len];
        let modulation = &modulation[..len];
        let envelope = &envelope[..len];

        // Soft clip moves once per block on the slow coefficient.
        let soft_clip = self.soft_clip.advance_towards(f64::from(params.soft_clip));
        let drive = map_range(soft_clip, 0.0, 1.0, 0.0, self.config.max_soft_clip_drive);

        let feedback_base = f64::from(params.feedback);
        let feedback_env = f64::from(params.feedback_envelope_amount);
        let wet_target = f64::from(params.wet_dry);
        let max_delay = self.config.max_delay_samples();

        for i in 0..len {
            let feedback_target = feedback_base + f64::from(envelope[i]) * feedback_env;
            self.feedback.advance_towards(feedback_target);
            // Negative amounts invert the repeats; map_range is linear, so the
            // gain lands in [-max_feedback_gain, max_feedback_gain].
            let feedback = self.feedback.clamp_current(-1.0, 1.0);
            let feedback_gain = map_range(feedback, 0.0, 1.0, 0.0, self.config.max_feedback_gain);

            let time_target = self.config.base_delay_seconds
                + self.config.mod_depth_seconds * f64::from(modulation[i]);
            let time = self.time.advance_towards(time_target);
            let delay_samples = (time * self.sample_rate).clamp(0.0, max_delay);

            let delayed = self.line.read(delay_samples);

            let dry = f64::from(input[i]);
            self.line
                .write(tanh_clip(dry + self.feedback_sample * feedback_gain, drive));

            self.feedback_sample = delayed;

            let wet = self.wet.advance_towards(wet_target);
            output[i] = (dry * (1.0 - wet) + delayed * wet) as f32;
        }
    }

    /// Effective feedback gain from the current smoothed feedback amount.
    ///
    /// Always within `[-max_feedback_gain, max_feedback_gain]`. A negative
    /// gain comes from a negative envelope amount and flips every repeat.
    pub fn feedback_gain(&self) -> f64 {
        map_range(
            self.feedback.get().clamp(-1.0, 1.0),
            0.0,
            1.0,
            0.0,
            self.config.max_feedback_gain,
        )
    }

    /// Current smoothed delay time in seconds.
    pub fn delay_time(&self) -> f64 {
        self.time.get()
    }

    /// Current smoothed wet/dry amount.
    pub fn wet_dry(&self) -> f64 {
        self.wet.get()
    }

    /// Current smoothed soft clip amount.
    pub fn soft_clip(&self) -> f64 {
        self.soft_clip.get()
    }

    /// Current smoothed feedback amount (after the `[-1, 1]` clamp).
    pub fn feedback_amount(&self) -> f64 {
        self.feedback.get()
    }

    /// Read access to the underlying ring.
    pub fn delay_line(&self) -> &FractionalDelayLine {
        &self.line
    }
}

impl Default for DelayEngine {
    fn default() -> Self {
        Self::new()
    }
}
