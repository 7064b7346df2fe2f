//! File-based chorus rendering command.

use super::common::{linear_to_db, parse_key_val, peak, progress_bar, resolve_preset, rms};
use crate::wav::{WavSpec, read_wav, write_wav};
use anemone_core::{ChorusProcessor, EngineConfig};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory preset name or preset file (TOML)
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g., "mix=0.7")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size in frames. Soft clip smoothing steps once per
    /// block, and blocks over 1024 frames are split
    #[arg(long, default_value = "512", value_parser = clap::value_parser!(u32).range(1..))]
    block_size: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let preset = resolve_preset(args.preset.as_deref(), &args.param)?;

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav(&args.input)?;
    let channels = usize::from(spec.channels.max(1));
    let frames = spec.frames(samples.len());

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        channels,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    let sample_rate = f64::from(spec.sample_rate);
    let config = EngineConfig::default();
    config.validate()?;
    config.check_sample_rate(sample_rate)?;

    let mut chorus = ChorusProcessor::with_config(channels, config);
    chorus.prepare(sample_rate);
    chorus.set_waveform(preset.waveform.into());
    let params = preset.chorus_params();

    println!("Processing with preset '{}'...", preset.name);
    tracing::info!(
        preset = %preset.name,
        channels,
        sample_rate = spec.sample_rate,
        block_size = args.block_size,
        "rendering"
    );

    let input_rms = rms(&samples);
    let input_peak = peak(&samples);

    let pb = progress_bar(frames as u64);
    let block_frames = args.block_size as usize;
    for (i, block) in samples.chunks_mut(block_frames * channels).enumerate() {
        chorus.process_interleaved(&params, block);
        pb.set_position(((i + 1) * block_frames).min(frames) as u64);
    }
    pb.finish_with_message("done");

    let output_rms = rms(&samples);
    let output_peak = peak(&samples);

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(output_rms),
        linear_to_db(output_peak)
    );

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &samples, out_spec)?;
    println!("Done!");

    Ok(())
}
