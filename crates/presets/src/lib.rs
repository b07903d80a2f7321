//! Named ColorBends presets loaded from TOML.
//!
//! A preset bundles a color palette with the field parameters of one
//! background variant. Every numeric field is optional; the renderer's
//! documented defaults apply to anything a preset leaves out, so presets
//! only state what they change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse presets: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid presets: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetsConfig {
    pub version: u32,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Preset used when the caller does not select one.
    pub preset: Option<String>,
}

/// One background variant. Color lists longer than the renderer's capacity
/// of eight are accepted here; the renderer truncates.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Preset {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub auto_rotate: Option<f32>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub frequency: Option<f32>,
    #[serde(default)]
    pub warp_strength: Option<f32>,
    #[serde(default)]
    pub mouse_influence: Option<f32>,
    #[serde(default)]
    pub parallax: Option<f32>,
    #[serde(default)]
    pub noise: Option<f32>,
}

/// Presets shipped with the binary: the dark intake-form backdrop and the
/// green stage variant.
const BUILTIN: &str = r##"
version = 1

[defaults]
preset = "charcoal"

[presets.charcoal]
colors = ["#1a1a1a", "#2d2d2d", "#404040"]
speed = 0.15
rotation = 0
auto_rotate = 2
scale = 1.5
frequency = 0.8
warp_strength = 0.6
mouse_influence = 0.2
parallax = 0.3
noise = 0.02

[presets.stage]
colors = ["#0a4d3c", "#1a6b54", "#2d8c6d", "#3fad85"]
auto_rotate = 10
scale = 1.2
frequency = 1.2
mouse_influence = 0.5
noise = 0.03
"##;

impl PresetsConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PresetsConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// The presets bundled into the binary.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN).expect("builtin presets parse")
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn default_preset(&self) -> Option<&str> {
        self.defaults.preset.as_deref()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported presets version {}; expected 1",
                self.version
            )));
        }

        if self.presets.is_empty() {
            return Err(ConfigError::Invalid(
                "presets file must define at least one preset".into(),
            ));
        }

        for (name, preset) in &self.presets {
            for color in &preset.colors {
                if color.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "preset '{name}' contains an empty color entry"
                    )));
                }
            }

            let numeric = [
                ("speed", preset.speed),
                ("rotation", preset.rotation),
                ("auto_rotate", preset.auto_rotate),
                ("scale", preset.scale),
                ("frequency", preset.frequency),
                ("warp_strength", preset.warp_strength),
                ("mouse_influence", preset.mouse_influence),
                ("parallax", preset.parallax),
                ("noise", preset.noise),
            ];
            for (field, value) in numeric {
                if let Some(value) = value {
                    if !value.is_finite() {
                        return Err(ConfigError::Invalid(format!(
                            "preset '{name}' field '{field}' must be finite"
                        )));
                    }
                }
            }
        }

        if let Some(default_preset) = &self.defaults.preset {
            if !self.presets.contains_key(default_preset) {
                return Err(ConfigError::Invalid(format!(
                    "defaults.preset references unknown preset '{default_preset}'"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
version = 1

[defaults]
preset = "dusk"

[presets.dusk]
colors = ["#1a1a2e", "#16213e", "#0f3460"]
speed = 0.15
noise = 0.05

[presets.plain]
colors = ["#202020"]
"##;

    #[test]
    fn parses_sample_config() {
        let config = PresetsConfig::from_toml_str(SAMPLE).expect("parse presets");
        assert_eq!(config.version, 1);
        assert_eq!(config.default_preset(), Some("dusk"));
        let dusk = config.preset("dusk").expect("dusk preset");
        assert_eq!(dusk.colors.len(), 3);
        assert_eq!(dusk.speed, Some(0.15));
        assert_eq!(dusk.rotation, None);
    }

    #[test]
    fn builtin_presets_are_valid() {
        let config = PresetsConfig::builtin();
        let charcoal = config.preset("charcoal").expect("charcoal preset");
        assert_eq!(charcoal.colors.len(), 3);
        assert_eq!(charcoal.speed, Some(0.15));
        assert_eq!(charcoal.auto_rotate, Some(2.0));
        assert_eq!(charcoal.scale, Some(1.5));
        assert_eq!(charcoal.noise, Some(0.02));
        let stage = config.preset("stage").expect("stage preset");
        assert_eq!(stage.colors.len(), 4);
        assert_eq!(stage.auto_rotate, Some(10.0));
        assert_eq!(config.default_preset(), Some("charcoal"));
    }

    #[test]
    fn rejects_unknown_default_preset() {
        let err = PresetsConfig::from_toml_str(
            r##"
version = 1

[defaults]
preset = "missing"

[presets.main]
colors = ["#ffffff"]
"##,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_wrong_version() {
        let err = PresetsConfig::from_toml_str(
            r##"
version = 2

[presets.main]
colors = ["#ffffff"]
"##,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_file() {
        let err = PresetsConfig::from_toml_str("version = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = PresetsConfig::from_toml_str(
            r##"
version = 1

[presets.main]
colors = ["#ffffff"]
scale = nan
"##,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn long_color_lists_are_accepted() {
        let colors: Vec<String> = (0..12).map(|i| format!("\"#0000{i:02x}\"")).collect();
        let config = PresetsConfig::from_toml_str(&format!(
            "version = 1\n\n[presets.many]\ncolors = [{}]\n",
            colors.join(", ")
        ))
        .expect("long palette parses");
        assert_eq!(config.preset("many").unwrap().colors.len(), 12);
    }
}
