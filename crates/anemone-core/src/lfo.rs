//! Block-rendering low-frequency oscillator.
//!
//! The LFO renders a whole block of modulation into an internal buffer that
//! the delay engine then reads. Only the phase survives between calls; the
//! buffer is overwritten every time.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::f32::consts::TAU;
use libm::{floorf, sinf};

use crate::config::MAX_BUFFER_DELAY_SIZE;

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth, natural modulation
    #[default]
    Sine,
    /// Linear ramps, harder corners than sine
    Triangle,
    /// Rising ramp, abrupt reset
    Saw,
    /// Binary on/off modulation
    Square,
}

impl LfoWaveform {
    /// Bipolar waveform value in `[-1, 1]` at `phase` in `[0, 1)`.
    #[inline]
    pub fn value_at(self, phase: f32) -> f32 {
        match self {
            Self::Sine => sinf(phase * TAU),
            Self::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Self::Saw => 2.0 * phase - 1.0,
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Wraps any finite phase into `[0, 1)`.
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    // -tiny - floor(-tiny) rounds up to exactly 1.0 in f32.
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Low Frequency Oscillator rendering one block per call.
///
/// # Example
///
/// ```rust
/// use anemone_core::Lfo;
///
/// let mut lfo = Lfo::new();
/// lfo.set_sample_rate(48000.0);
///
/// // 2 Hz at half depth, no phase offset, one 256-sample block.
/// lfo.process(2.0, 0.5, 0.0, 256);
/// assert_eq!(lfo.buffer().len(), 256);
/// assert!(lfo.buffer().iter().all(|v| v.abs() <= 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Sample rate in Hz
    sample_rate: f64,
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Waveform type
    waveform: LfoWaveform,
    /// Rendered block, capacity fixed at construction
    buffer: Vec<f32>,
    /// Samples rendered by the last `process` call
    rendered: usize,
}

impl Lfo {
    /// Creates an LFO whose buffer holds [`MAX_BUFFER_DELAY_SIZE`] samples.
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_DELAY_SIZE)
    }

    /// Creates an LFO with a custom block capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sample_rate: crate::engine::UNCONFIGURED_SAMPLE_RATE,
            phase: 0.0,
            waveform: LfoWaveform::Sine,
            buffer: vec![0.0; capacity],
            rendered: 0,
        }
    }

    /// Sets the sample rate used to turn rate (Hz) into phase increments.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "lfo configured");
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Set waveform
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Get current waveform
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Zeroes the phase and the rendered buffer.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.buffer.fill(0.0);
        self.rendered = 0;
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Maximum block length [`process`](Self::process) can render.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Renders `sample_count` samples of `waveform(phase + phase_offset) * depth`.
    ///
    /// The phase advances by `rate / sample_rate` per sample and wraps into
    /// `[0, 1)`. `phase_offset` is in cycles and only shifts the output; it
    /// does not accumulate.
    ///
    /// `sample_count` must not exceed [`capacity`](Self::capacity); longer
    /// requests are truncated (and trip a debug assertion).
    pub fn process(&mut self, rate: f32, depth: f32, phase_offset: f32, sample_count: usize) {
        debug_assert!(
            sample_count <= self.buffer.len(),
            "LFO block of {sample_count} exceeds capacity {}",
            self.buffer.len()
        );
        debug_assert!(self.sample_rate > 0.0, "Lfo::process called before set_sample_rate");

        let count = sample_count.min(self.buffer.len());
        let increment = (f64::from(rate) / self.sample_rate) as f32;

        for slot in &mut self.buffer[..count] {
            *slot = self.waveform.value_at(wrap_phase(self.phase + phase_offset)) * depth;
            self.phase = wrap_phase(self.phase + increment);
        }
        self.rendered = count;
    }

    /// The block rendered by the last [`process`](Self::process) call.
    ///
    /// Borrowed from the LFO and overwritten by the next call.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer[..self.rendered]
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lfo(sample_rate: f64) -> Lfo {
        let mut lfo = Lfo::with_capacity(4096);
        lfo.set_sample_rate(sample_rate);
        lfo
    }

    #[test]
    fn one_hertz_completes_a_cycle() {
        let mut lfo = lfo(4000.0);
        lfo.process(1.0, 1.0, 0.0, 4000);
        let phase_error = lfo.phase().min((lfo.phase() - 1.0).abs());
        assert!(phase_error < 1e-3, "phase {}", lfo.phase());
    }

    #[test]
    fn first_sample_uses_phase_before_increment() {
        let mut lfo = lfo(48000.0);
        lfo.process(5.0, 1.0, 0.0, 1);
        assert_eq!(lfo.buffer()[0], 0.0);
    }

    #[test]
    fn depth_scales_output() {
        let mut lfo = lfo(1000.0);
        lfo.process(3.0, 0.25, 0.0, 1000);
        let peak = lfo.buffer().iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!(peak <= 0.25 + 1e-6);
        assert!(peak > 0.24);
    }

    #[test]
    fn quarter_offset_turns_sine_into_cosine() {
        let mut lfo = lfo(48000.0);
        lfo.process(2.0, 1.0, 0.25, 1);
        assert!((lfo.buffer()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn offset_does_not_accumulate() {
        let mut plain = lfo(48000.0);
        let mut shifted = lfo(48000.0);
        plain.process(3.0, 1.0, 0.0, 512);
        shifted.process(3.0, 1.0, 0.5, 512);
        assert_eq!(plain.phase(), shifted.phase());
    }

    #[test]
    fn phase_wraps_at_high_rate() {
        let mut lfo = lfo(100.0);
        lfo.process(250.0, 1.0, 0.0, 64);
        assert!((0.0..1.0).contains(&lfo.phase()));
    }

    #[test]
    fn waveform_ranges() {
        for waveform in [
            LfoWaveform::Sine,
            LfoWaveform::Triangle,
            LfoWaveform::Saw,
            LfoWaveform::Square,
        ] {
            let mut lfo = lfo(44100.0);
            lfo.set_waveform(waveform);
            lfo.process(7.0, 1.0, 0.1, 4096);
            for &value in lfo.buffer() {
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "Waveform {:?} out of range: {}",
                    waveform,
                    value
                );
            }
        }
    }

    #[test]
    fn reset_clears_phase_and_buffer() {
        let mut lfo = lfo(44100.0);
        lfo.process(5.0, 1.0, 0.0, 100);
        lfo.reset();
        assert_eq!(lfo.phase(), 0.0);
        assert!(lfo.buffer().is_empty());
    }

    #[test]
    fn wrap_phase_handles_negative_and_tiny() {
        assert_eq!(wrap_phase(-0.25), 0.75);
        assert_eq!(wrap_phase(-1e-10), 0.0);
        assert_eq!(wrap_phase(1.5), 0.5);
    }
}
