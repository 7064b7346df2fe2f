//! Chorus presets.
//!
//! A preset is a TOML file holding one set of chorus parameters and an LFO
//! waveform. Factory presets are embedded at compile time and selected by
//! name; anything else is loaded from a path.

use crate::error::{CliError, Result};
use anemone_core::{ChorusParams, LfoWaveform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// LFO shape as written in preset files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// Sine
    #[default]
    Sine,
    /// Triangle
    Triangle,
    /// Rising saw
    Saw,
    /// Square
    Square,
}

impl From<Waveform> for LfoWaveform {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => LfoWaveform::Sine,
            Waveform::Triangle => LfoWaveform::Triangle,
            Waveform::Saw => LfoWaveform::Saw,
            Waveform::Square => LfoWaveform::Square,
        }
    }
}

impl FromStr for Waveform {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Self::Sine),
            "triangle" | "tri" => Ok(Self::Triangle),
            "saw" | "sawtooth" => Ok(Self::Saw),
            "square" | "sqr" => Ok(Self::Square),
            _ => Err(CliError::invalid_parameter(
                "waveform",
                format!("unknown waveform '{s}' (expected sine, triangle, saw or square)"),
            )),
        }
    }
}

/// Chorus parameters as stored in a preset file.
///
/// Missing keys take the [`ChorusParams`] defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetParams {
    /// LFO rate in Hz
    pub rate_hz: f64,
    /// LFO depth (0-1)
    pub depth: f64,
    /// LFO phase step between channels, in cycles
    pub phase_offset: f64,
    /// Base feedback (0-1)
    pub feedback: f64,
    /// Envelope contribution to feedback (-1 to 1)
    pub feedback_envelope: f64,
    /// Wet/dry mix (0-1)
    pub wet_dry: f64,
    /// Soft clip amount (0-1)
    pub soft_clip: f64,
}

impl Default for PresetParams {
    fn default() -> Self {
        let params = ChorusParams::default();
        Self {
            rate_hz: f64::from(params.rate_hz),
            depth: f64::from(params.depth),
            phase_offset: f64::from(params.phase_offset),
            feedback: f64::from(params.feedback),
            feedback_envelope: f64::from(params.feedback_envelope),
            wet_dry: f64::from(params.wet_dry),
            soft_clip: f64::from(params.soft_clip),
        }
    }
}

/// A named chorus setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Name of the preset
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// LFO waveform
    #[serde(default)]
    pub waveform: Waveform,
    /// Chorus parameters
    #[serde(default)]
    pub params: PresetParams,
}

impl Preset {
    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CliError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The engine-facing parameter snapshot.
    ///
    /// Values are passed through unclamped; the processor clamps per block.
    pub fn chorus_params(&self) -> ChorusParams {
        let p = &self.params;
        ChorusParams {
            rate_hz: p.rate_hz as f32,
            depth: p.depth as f32,
            phase_offset: p.phase_offset as f32,
            feedback: p.feedback as f32,
            feedback_envelope: p.feedback_envelope as f32,
            wet_dry: p.wet_dry as f32,
            soft_clip: p.soft_clip as f32,
        }
    }

    /// Applies one `key=value` override from the command line.
    ///
    /// Accepts the field names plus the short aliases `rate`, `phase`,
    /// `envelope`, `mix` and `clip`.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<()> {
        if key == "waveform" {
            self.waveform = value.parse()?;
            return Ok(());
        }

        let slot = match key {
            "rate" | "rate_hz" => &mut self.params.rate_hz,
            "depth" => &mut self.params.depth,
            "phase" | "phase_offset" => &mut self.params.phase_offset,
            "feedback" => &mut self.params.feedback,
            "envelope" | "feedback_envelope" => &mut self.params.feedback_envelope,
            "mix" | "wet_dry" => &mut self.params.wet_dry,
            "clip" | "soft_clip" => &mut self.params.soft_clip,
            _ => return Err(CliError::invalid_parameter(key, "unknown parameter")),
        };

        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| CliError::invalid_parameter(key, format!("'{value}' is not a number")))?;
        if !parsed.is_finite() {
            return Err(CliError::invalid_parameter(key, "value must be finite"));
        }
        *slot = parsed;
        Ok(())
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            name: "Init".to_string(),
            description: None,
            waveform: Waveform::Sine,
            params: PresetParams::default(),
        }
    }
}

/// Factory preset names, in display order.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "subtle", "lush", "seasick", "flange", "swell"];

/// TOML content for factory presets.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("subtle", SUBTLE_PRESET),
    ("lush", LUSH_PRESET),
    ("seasick", SEASICK_PRESET),
    ("flange", FLANGE_PRESET),
    ("swell", SWELL_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Default chorus settings"
"#;

const SUBTLE_PRESET: &str = r#"
name = "Subtle"
description = "Gentle thickening with little movement"

[params]
rate_hz = 0.5
depth = 0.3
phase_offset = 0.25
feedback = 0.1
wet_dry = 0.3
"#;

const LUSH_PRESET: &str = r#"
name = "Lush"
description = "Wide, deep stereo chorus"

[params]
rate_hz = 0.8
depth = 0.8
phase_offset = 0.5
feedback = 0.3
wet_dry = 0.5
soft_clip = 0.1
"#;

const SEASICK_PRESET: &str = r#"
name = "Seasick"
description = "Fast triangle vibrato, fully wet"
waveform = "triangle"

[params]
rate_hz = 4.5
depth = 1.0
phase_offset = 0.0
feedback = 0.0
wet_dry = 1.0
"#;

const FLANGE_PRESET: &str = r#"
name = "Flange"
description = "Slow sweep with heavy, softly clipped feedback"

[params]
rate_hz = 0.2
depth = 0.9
phase_offset = 0.25
feedback = 0.85
feedback_envelope = 0.1
wet_dry = 0.5
soft_clip = 0.4
"#;

const SWELL_PRESET: &str = r#"
name = "Swell"
description = "Feedback that blooms with playing dynamics"

[params]
rate_hz = 0.6
depth = 0.6
feedback = 0.2
feedback_envelope = 0.6
wet_dry = 0.6
soft_clip = 0.3
"#;

/// Look up a factory preset by name (case-insensitive).
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name = name.to_ascii_lowercase();
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| *key == name)
        .and_then(|(_, toml_str)| Preset::from_toml(toml_str).ok())
}

/// All factory presets, in display order.
pub fn factory_presets() -> Vec<(&'static str, Preset)> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(key, toml_str)| Preset::from_toml(toml_str).ok().map(|p| (*key, p)))
        .collect()
}

/// Load a preset by factory name or file path.
pub fn load_preset(name: &str) -> Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        tracing::debug!(name, "using factory preset");
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading preset file");
        return Preset::load(path);
    }

    Err(CliError::PresetNotFound(name.to_string()))
}
