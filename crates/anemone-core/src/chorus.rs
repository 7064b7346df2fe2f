//! Per-channel chorus composition.
//!
//! [`ChorusChannel`] runs the block-level control flow for one audio
//! channel: LFO block, envelope block, then the delay engine.
//! [`ChorusProcessor`] owns one channel per audio channel. Channels share
//! nothing; the only thing that differs between them is the LFO phase
//! offset, which spreads the modulation across the stereo field.
//!
//! The soft clip smoother steps once per engine call, so both channel and
//! processor cut audio at the same [`MAX_BLOCK_FRAMES`] boundaries. Planar
//! and interleaved input then render identically.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::config::EngineConfig;
use crate::engine::DelayEngine;
use crate::envelope::EnvelopeFollower;
use crate::lfo::{Lfo, LfoWaveform};
use crate::params::ChorusParams;

/// Longest sub-block handed to [`DelayEngine::process`].
///
/// Capped further by the configured capacity, see
/// [`ChorusChannel::block_frames`].
pub const MAX_BLOCK_FRAMES: usize = 1024;

fn block_frames_for(config: &EngineConfig) -> usize {
    config.capacity.clamp(1, MAX_BLOCK_FRAMES)
}

/// One channel of chorus: LFO, envelope follower and delay engine.
///
/// All scratch memory is allocated at construction. Blocks longer than
/// [`block_frames`](Self::block_frames) are split internally.
#[derive(Debug, Clone)]
pub struct ChorusChannel {
    lfo: Lfo,
    envelope: EnvelopeFollower,
    engine: DelayEngine,
    block_frames: usize,
    /// Envelope levels for the current sub-block
    envelope_block: Vec<f32>,
    /// Copy of the dry input for in-place processing
    dry_block: Vec<f32>,
}

impl ChorusChannel {
    /// Creates a channel with the reference [`EngineConfig`].
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a channel from an explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let block_frames = block_frames_for(&config);
        Self {
            lfo: Lfo::with_capacity(config.capacity),
            envelope: EnvelopeFollower::default(),
            engine: DelayEngine::with_config(config),
            block_frames,
            envelope_block: vec![0.0; block_frames],
            dry_block: vec![0.0; block_frames],
        }
    }

    /// Propagates the sample rate to every component.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.lfo.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
        self.engine.set_sample_rate(sample_rate);
    }

    /// Resets LFO phase, envelope level and the delay engine.
    pub fn reset(&mut self) {
        self.lfo.reset();
        self.envelope.reset();
        self.engine.reset();
    }

    /// Selects the LFO waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.lfo.set_waveform(waveform);
    }

    /// Processes `input` into `output` with this channel's LFO phase offset.
    ///
    /// `params` is used as given; [`ChorusProcessor`] clamps before calling.
    ///
    /// # Panics
    ///
    /// Panics if `input` is shorter than `output`.
    pub fn process(
        &mut self,
        params: &ChorusParams,
        phase_offset: f32,
        input: &[f32],
        output: &mut [f32],
    ) {
        let input = &input[..output.len()];
        let block = self.block_frames;
        let delay_params = params.delay_params();

        for (in_chunk, out_chunk) in input.chunks(block).zip(output.chunks_mut(block)) {
            let len = in_chunk.len();
            self.lfo
                .process(params.rate_hz, params.depth, phase_offset, len);
            let envelope = &mut self.envelope_block[..len];
            self.envelope.process_block(in_chunk, envelope);
            self.engine.process(
                in_chunk,
                &delay_params,
                self.lfo.buffer(),
                envelope,
                out_chunk,
            );
        }
    }

    /// Processes `buffer` in place.
    pub fn process_in_place(&mut self, params: &ChorusParams, phase_offset: f32, buffer: &mut [f32]) {
        let block = self.block_frames;
        let delay_params = params.delay_params();

        for chunk in buffer.chunks_mut(block) {
            let len = chunk.len();
            let dry = &mut self.dry_block[..len];
            dry.copy_from_slice(chunk);

            self.lfo
                .process(params.rate_hz, params.depth, phase_offset, len);
            let envelope = &mut self.envelope_block[..len];
            self.envelope.process_block(dry, envelope);
            self.engine
                .process(dry, &delay_params, self.lfo.buffer(), envelope, chunk);
        }
    }

    /// Frames per engine call; longer blocks are split at this size.
    pub fn block_frames(&self) -> usize {
        self.block_frames
    }

    /// The channel's delay engine.
    pub fn engine(&self) -> &DelayEngine {
        &self.engine
    }

    /// The channel's LFO.
    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }
}

impl Default for ChorusChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Multi-channel chorus: independent [`ChorusChannel`]s with spread LFO
/// phases.
///
/// Channel `k` runs its LFO at phase offset `k * params.phase_offset`.
///
/// # Example
///
/// ```rust
/// use anemone_core::{ChorusParams, ChorusProcessor};
///
/// let mut chorus = ChorusProcessor::new(2);
/// chorus.prepare(44100.0);
///
/// // Interleaved stereo, 128 frames.
/// let mut audio = vec![0.25f32; 256];
/// chorus.process_interleaved(&ChorusParams::default(), &mut audio);
/// assert!(audio.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct ChorusProcessor {
    channels: Vec<ChorusChannel>,
    /// Per-channel deinterleave scratch
    scratch: Vec<Vec<f32>>,
    block_frames: usize,
    sample_rate: f64,
}

impl ChorusProcessor {
    /// Creates a processor with `num_channels` channels and the reference
    /// configuration.
    pub fn new(num_channels: usize) -> Self {
        Self::with_config(num_channels, EngineConfig::default())
    }

    /// Creates a processor with an explicit configuration.
    pub fn with_config(num_channels: usize, config: EngineConfig) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_channels,
            capacity = config.capacity,
            "chorus processor created"
        );

        let block_frames = block_frames_for(&config);
        Self {
            channels: (0..num_channels)
                .map(|_| ChorusChannel::with_config(config))
                .collect(),
            scratch: (0..num_channels)
                .map(|_| vec![0.0; block_frames])
                .collect(),
            block_frames,
            sample_rate: crate::engine::UNCONFIGURED_SAMPLE_RATE,
        }
    }

    /// Sets the sample rate on every channel and resets them.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        for channel in &mut self.channels {
            channel.set_sample_rate(sample_rate);
            channel.reset();
        }
    }

    /// Resets every channel.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }

    /// Selects the LFO waveform on every channel.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        for channel in &mut self.channels {
            channel.set_waveform(waveform);
        }
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate passed to the last [`prepare`](Self::prepare).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Frames per engine call, shared by every channel.
    ///
    /// The soft clip smoother takes one step per sub-block, so a host that
    /// wants output independent of its own buffer size should pass blocks
    /// that are multiples of this.
    pub fn block_frames(&self) -> usize {
        self.block_frames
    }

    /// Channel `index`, if it exists.
    pub fn channel(&self, index: usize) -> Option<&ChorusChannel> {
        self.channels.get(index)
    }

    /// Processes planar audio in place, one slice per channel.
    ///
    /// Extra slices beyond [`num_channels`](Self::num_channels) are left
    /// untouched.
    pub fn process(&mut self, params: &ChorusParams, audio: &mut [&mut [f32]]) {
        let params = params.clamped();
        for (k, (channel, buffer)) in self.channels.iter_mut().zip(audio.iter_mut()).enumerate() {
            channel.process_in_place(&params, params.phase_offset * k as f32, buffer);
        }
    }

    /// Processes interleaved audio in place.
    ///
    /// A trailing partial frame is left untouched.
    pub fn process_interleaved(&mut self, params: &ChorusParams, audio: &mut [f32]) {
        let num_channels = self.channels.len();
        if num_channels == 0 {
            return;
        }
        let params = params.clamped();
        let block_samples = self.block_frames * num_channels;

        for block in audio.chunks_mut(block_samples) {
            let frames = block.len() / num_channels;

            for (frame_index, frame) in block.chunks_exact(num_channels).enumerate() {
                for (scratch, &sample) in self.scratch.iter_mut().zip(frame) {
                    scratch[frame_index] = sample;
                }
            }

            for (k, (channel, scratch)) in self
                .channels
                .iter_mut()
                .zip(self.scratch.iter_mut())
                .enumerate()
            {
                channel.process_in_place(
                    &params,
                    params.phase_offset * k as f32,
                    &mut scratch[..frames],
                );
            }

            for (frame_index, frame) in block.chunks_exact_mut(num_channels).enumerate() {
                for (sample, scratch) in frame.iter_mut().zip(&self.scratch) {
                    *sample = scratch[frame_index];
                }
            }
        }
    }
}
