//! Anemone Core - the DSP engine of the Anemone chorus
//!
//! A modulated, feedback-driven fractional-delay line with smoothed
//! parameters and tanh soft clipping, driven by a low-frequency oscillator
//! and an external envelope signal. Everything in the audio path is
//! allocation-free; buffers are sized once at construction.
//!
//! # Signal Path
//!
//! Per audio block and per channel:
//!
//! 1. [`Lfo::process`] fills a modulation block.
//! 2. [`EnvelopeFollower::process_block`] fills an envelope block.
//! 3. [`DelayEngine::process`] consumes input, modulation and envelope and
//!    writes the effected output.
//!
//! [`ChorusChannel`] wires these three together, and [`ChorusProcessor`]
//! runs one independent channel per audio channel.
//!
//! # Building Blocks
//!
//! - [`FractionalDelayLine`] - ring buffer with two-point linear interpolation
//! - [`SmoothedParam`] - one-pole coefficient smoother
//! - [`ChorusParams`] / [`SharedParams`] - parameter snapshots and their
//!   lock-free handoff from a control thread
//! - [`EngineConfig`] - immutable constants bundle passed at construction
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard library:
//!
//! ```toml
//! [dependencies]
//! anemone-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use anemone_core::{ChorusParams, ChorusProcessor};
//!
//! let mut chorus = ChorusProcessor::new(2);
//! chorus.prepare(48000.0);
//!
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! chorus.process(&ChorusParams::default(), &mut [&mut left[..], &mut right[..]]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod config;
pub mod delay;
pub mod engine;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod param;
pub mod params;

pub use chorus::{ChorusChannel, ChorusProcessor, MAX_BLOCK_FRAMES};
pub use config::{
    BASE_DELAY_SECONDS, ConfigIssue, EngineConfig, MAX_BUFFER_DELAY_SIZE, MAX_FEEDBACK_GAIN,
    MAX_SOFT_CLIP_DRIVE, MOD_DEPTH_SECONDS, SMOOTHING_COEFF_FINE, SMOOTHING_COEFF_GENERIC,
    SOFT_CLIP_FLOOR,
};
pub use delay::{FractionalDelayLine, ReadTaps};
pub use engine::{DelayEngine, DelayParams, UNCONFIGURED_SAMPLE_RATE};
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{lerp, map_range, tanh_clip};
pub use param::SmoothedParam;
pub use params::{ChorusParams, SharedParams};
