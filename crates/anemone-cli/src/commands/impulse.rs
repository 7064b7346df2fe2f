//! Impulse response rendering command.
//!
//! Feeds a single unit impulse through the chorus and writes the result.
//! The delay time smoother starts at zero after a reset, so by default the
//! engine first runs on silence until every smoother has settled. The
//! per-sample smoothers need a few thousand samples. The soft clip smoother
//! steps once per engine sub-block, so its settling time is counted in
//! blocks.

use super::common::{parse_key_val, peak, resolve_preset};
use crate::wav::{WavSpec, write_wav};
use anemone_core::{ChorusProcessor, EngineConfig, SmoothedParam};
use clap::Args;
use std::path::PathBuf;

/// Remaining fraction of a step change treated as settled.
const SETTLE_RATIO: f64 = 1e-6;

/// Silent frames needed before both smoothing rates have settled.
///
/// `block_frames` is the processor's sub-block size; the soft clip smoother
/// takes one step per sub-block.
fn default_pre_roll(config: &EngineConfig, block_frames: usize) -> usize {
    let per_sample = SmoothedParam::new(0.0, config.fine_coeff).steps_to_settle(SETTLE_RATIO);
    let per_block = SmoothedParam::new(0.0, config.generic_coeff).steps_to_settle(SETTLE_RATIO);
    per_sample.max(per_block * block_frames)
}

#[derive(Args)]
pub struct ImpulseArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Response length in samples
    #[arg(long, default_value = "4800")]
    length: usize,

    /// Number of output channels
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..=8))]
    channels: u16,

    /// Silent frames processed before the impulse (default: until the
    /// per-sample and per-block smoothers settle)
    #[arg(long)]
    pre_roll: Option<usize>,

    /// Factory preset name or preset file (TOML)
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g., "feedback=0.8")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    let preset = resolve_preset(args.preset.as_deref(), &args.param)?;
    let sample_rate = f64::from(args.sample_rate);
    let channels = usize::from(args.channels);

    let config = EngineConfig::default();
    config.validate()?;
    config.check_sample_rate(sample_rate)?;

    let mut chorus = ChorusProcessor::with_config(channels, config);
    chorus.prepare(sample_rate);
    chorus.set_waveform(preset.waveform.into());
    let params = preset.chorus_params();

    let block_frames = chorus.block_frames();
    let pre_roll = args
        .pre_roll
        .unwrap_or_else(|| default_pre_roll(&config, block_frames));
    tracing::debug!(
        pre_roll,
        block_frames,
        length = args.length,
        "rendering impulse response"
    );

    // One sub-block of silence at a time; the output is discarded.
    let mut silence = vec![0.0f32; block_frames * channels];
    let mut remaining = pre_roll;
    while remaining > 0 {
        let frames = remaining.min(block_frames);
        let block = &mut silence[..frames * channels];
        block.fill(0.0);
        chorus.process_interleaved(&params, block);
        remaining -= frames;
    }

    let mut response = vec![0.0f32; args.length * channels];
    if args.length > 0 {
        response[..channels].fill(1.0);
    }
    chorus.process_interleaved(&params, &mut response);

    println!(
        "Impulse response: {} samples x {} channel(s) at {} Hz, preset '{}', peak {:.3}",
        args.length,
        channels,
        args.sample_rate,
        preset.name,
        peak(&response)
    );

    let spec = WavSpec {
        channels: args.channels,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav(&args.output, &response, spec)?;
    println!("Wrote {}", args.output.display());

    Ok(())
}
