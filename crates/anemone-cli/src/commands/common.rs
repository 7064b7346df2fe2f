//! Shared CLI helpers used across multiple commands.

use crate::error::Result;
use crate::preset::{Preset, load_preset};
use indicatif::{ProgressBar, ProgressStyle};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].trim().to_string(), parts[1].trim().to_string()))
}

/// Resolve the preset (or the defaults) and apply `--param` overrides.
pub fn resolve_preset(name: Option<&str>, overrides: &[(String, String)]) -> Result<Preset> {
    let mut preset = match name {
        Some(name) => load_preset(name)?,
        None => Preset::default(),
    };
    for (key, value) in overrides {
        preset.apply_override(key, value)?;
        tracing::debug!(key = %key, value = %value, "parameter override");
    }
    Ok(preset)
}

/// Progress bar in the house style.
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

/// Root mean square of `samples`.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// Linear amplitude to dBFS, floored at -120 dB.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
