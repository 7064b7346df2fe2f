//! Integration tests for anemone-cli.
//!
//! Tests cover the CLI binary invocation and end-to-end file rendering.

use std::path::Path;
use std::process::Command;

/// Helper to get the path to the `anemone` binary built by cargo.
fn anemone_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_anemone"))
}

fn write_test_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_float_wav(path: &Path) -> (Vec<f32>, hound::WavSpec) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader
        .into_samples::<f32>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (samples, spec)
}

// ---------------------------------------------------------------------------
// `anemone --help` / `--version`
// ---------------------------------------------------------------------------

#[test]
fn cli_help_works() {
    let output = anemone_bin()
        .arg("--help")
        .output()
        .expect("failed to run anemone --help");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Anemone chorus renderer"));
    assert!(stdout.contains("process"));
    assert!(stdout.contains("impulse"));
    assert!(stdout.contains("presets"));
}

#[test]
fn cli_version_works() {
    let output = anemone_bin()
        .arg("--version")
        .output()
        .expect("failed to run anemone --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("anemone"));
}

// ---------------------------------------------------------------------------
// `anemone presets`
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_lists_factory_presets() {
    let output = anemone_bin()
        .arg("presets")
        .output()
        .expect("failed to run anemone presets");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["init", "subtle", "lush", "seasick", "flange", "swell"] {
        assert!(stdout.contains(name), "listing should contain '{name}'");
    }
}

#[test]
fn cli_presets_prints_toml() {
    let output = anemone_bin()
        .args(["presets", "seasick"])
        .output()
        .expect("failed to run anemone presets seasick");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name = \"Seasick\""));
    assert!(stdout.contains("waveform = \"triangle\""));
    assert!(stdout.contains("[params]"));
}

#[test]
fn cli_presets_unknown_fails() {
    let output = anemone_bin()
        .args(["presets", "no_such_preset_xyz"])
        .output()
        .expect("failed to run anemone");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("preset not found"),
        "error should mention missing preset, got: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// `anemone process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_stereo_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_test_wav(&input, 2, 44100, 22050);

    let output = anemone_bin()
        .args(["process"])
        .arg(&input)
        .arg(&output_path)
        .args(["--preset", "lush", "--param", "mix=0.7", "--block-size", "300"])
        .output()
        .expect("failed to run anemone process");

    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stats:"));

    let (samples, spec) = read_float_wav(&output_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(samples.len(), 22050 * 2);
    assert!(samples.iter().all(|s| s.is_finite()));

    // Phase-offset LFOs make the channels differ even with identical input.
    let differs = samples.chunks_exact(2).any(|f| (f[0] - f[1]).abs() > 1e-4);
    assert!(differs, "stereo channels should diverge");
}

#[test]
fn cli_process_sixteen_bit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mono.wav");
    let output_path = dir.path().join("mono16.wav");
    write_test_wav(&input, 1, 48000, 4800);

    let status = anemone_bin()
        .arg("process")
        .arg(&input)
        .arg(&output_path)
        .args(["--bit-depth", "16"])
        .status()
        .expect("failed to run anemone process");
    assert!(status.success());

    let reader = hound::WavReader::open(&output_path).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.len(), 4800);
}

#[test]
fn cli_process_bad_param_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_test_wav(&input, 1, 48000, 480);

    let output = anemone_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--param", "wobble=3"])
        .output()
        .expect("failed to run anemone process");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("wobble"), "got: {stderr}");
}

#[test]
fn cli_process_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = anemone_bin()
        .arg("process")
        .arg(dir.path().join("missing.wav"))
        .arg(dir.path().join("out.wav"))
        .output()
        .expect("failed to run anemone process");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WAV file error"), "got: {stderr}");
}

#[test]
fn cli_process_with_preset_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let preset = dir.path().join("custom.toml");
    let output_path = dir.path().join("out.wav");
    write_test_wav(&input, 1, 48000, 4800);
    std::fs::write(
        &preset,
        "name = \"Custom\"\nwaveform = \"square\"\n[params]\nwet_dry = 0.0\n",
    )
    .unwrap();

    let output = anemone_bin()
        .arg("process")
        .arg(&input)
        .arg(&output_path)
        .arg("--preset")
        .arg(&preset)
        .output()
        .expect("failed to run anemone process");
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Fully dry: the wet smoother starts at 0 and stays there.
    let (processed, _) = read_float_wav(&output_path);
    let (original, _) = read_float_wav(&input);
    for (a, b) in processed.iter().zip(&original) {
        assert!((a - b).abs() < 1e-6);
    }
}

// ---------------------------------------------------------------------------
// `anemone impulse`
// ---------------------------------------------------------------------------

#[test]
fn cli_impulse_lands_after_base_delay() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("ir.wav");

    let output = anemone_bin()
        .arg("impulse")
        .arg(&output_path)
        .args([
            "--sample-rate",
            "44100",
            "--length",
            "1000",
            "--channels",
            "1",
            "--param",
            "mix=1",
            "--param",
            "depth=0",
            "--param",
            "feedback=0",
        ])
        .output()
        .expect("failed to run anemone impulse");
    assert!(
        output.status.success(),
        "impulse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (samples, spec) = read_float_wav(&output_path);
    assert_eq!(spec.channels, 1);
    assert_eq!(samples.len(), 1000);

    // 3 ms at 44.1 kHz: energy split over samples 133 and 134.
    let peak_index = samples
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak_index, 133);
    assert!((samples[133] + samples[134] - 1.0).abs() < 1e-3);
}

#[test]
fn cli_impulse_rejects_zero_sample_rate() {
    let dir = tempfile::tempdir().unwrap();
    let output = anemone_bin()
        .arg("impulse")
        .arg(dir.path().join("ir.wav"))
        .args(["--sample-rate", "0"])
        .output()
        .expect("failed to run anemone impulse");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sample rate"), "got: {stderr}");
}
