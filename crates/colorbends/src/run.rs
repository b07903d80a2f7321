use std::fs;

use anyhow::{bail, Context, Result};
use presets::{Preset, PresetsConfig};
use renderer::{ColorPalette, FieldOptions, RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: Cli) -> Result<()> {
    let presets = load_presets(&args)?;
    let preset = select_preset(&args, &presets)?;

    let options = resolve_options(&args, preset);
    let palette = resolve_palette(&args, preset);
    if palette.is_empty() {
        tracing::warn!("palette is empty; the field will render black");
    }

    let policy = if args.still {
        RenderPolicy::Still {
            time: args.still_time.unwrap_or(0.0),
        }
    } else {
        RenderPolicy::Animate {
            target_fps: args.fps.filter(|fps| *fps > 0.0),
        }
    };

    let config = RendererConfig {
        surface_size: args.size.unwrap_or((1920, 1080)),
        title: args.title.clone().unwrap_or_else(|| "ColorBends".into()),
        palette,
        options,
        antialiasing: args.antialias,
        policy,
    };

    tracing::info!(
        colors = config.palette.len(),
        size = ?config.surface_size,
        policy = ?config.policy,
        "starting colorbends"
    );
    Renderer::new(config).run()
}

fn load_presets(args: &Cli) -> Result<PresetsConfig> {
    match &args.presets {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read presets file {}", path.display()))?;
            PresetsConfig::from_toml_str(&raw)
                .with_context(|| format!("failed to load presets from {}", path.display()))
        }
        None => Ok(PresetsConfig::builtin()),
    }
}

/// Picks the preset to start from: an explicit `--preset` must exist, and
/// without one the file's default applies (when present).
fn select_preset<'a>(args: &Cli, presets: &'a PresetsConfig) -> Result<Option<&'a Preset>> {
    if let Some(name) = &args.preset {
        match presets.preset(name) {
            Some(preset) => Ok(Some(preset)),
            None => {
                let known: Vec<_> = presets.presets.keys().map(String::as_str).collect();
                bail!(
                    "unknown preset '{name}'; available presets: {}",
                    known.join(", ")
                );
            }
        }
    } else {
        Ok(presets
            .default_preset()
            .and_then(|name| presets.preset(name)))
    }
}

/// Layered resolution: renderer defaults, then the preset, then explicit
/// flags, each overriding field by field.
fn resolve_options(args: &Cli, preset: Option<&Preset>) -> FieldOptions {
    let defaults = FieldOptions::default();
    let from_preset = |value: Option<f32>, fallback: f32| value.unwrap_or(fallback);
    let mut options = match preset {
        Some(preset) => FieldOptions {
            speed: from_preset(preset.speed, defaults.speed),
            rotation_degrees: from_preset(preset.rotation, defaults.rotation_degrees),
            auto_rotate: from_preset(preset.auto_rotate, defaults.auto_rotate),
            scale: from_preset(preset.scale, defaults.scale),
            frequency: from_preset(preset.frequency, defaults.frequency),
            warp_strength: from_preset(preset.warp_strength, defaults.warp_strength),
            mouse_influence: from_preset(preset.mouse_influence, defaults.mouse_influence),
            parallax: from_preset(preset.parallax, defaults.parallax),
            noise: from_preset(preset.noise, defaults.noise),
        },
        None => defaults,
    };

    if let Some(speed) = args.speed {
        options.speed = speed;
    }
    if let Some(rotation) = args.rotation {
        options.rotation_degrees = rotation;
    }
    if let Some(auto_rotate) = args.auto_rotate {
        options.auto_rotate = auto_rotate;
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if let Some(frequency) = args.frequency {
        options.frequency = frequency;
    }
    if let Some(warp_strength) = args.warp_strength {
        options.warp_strength = warp_strength;
    }
    if let Some(mouse_influence) = args.mouse_influence {
        options.mouse_influence = mouse_influence;
    }
    if let Some(parallax) = args.parallax {
        options.parallax = parallax;
    }
    if let Some(noise) = args.noise {
        options.noise = noise;
    }
    options
}

/// Explicit `--color` flags replace the preset palette wholesale.
fn resolve_palette(args: &Cli, preset: Option<&Preset>) -> ColorPalette {
    if !args.colors.is_empty() {
        ColorPalette::from_hex_strings(&args.colors)
    } else if let Some(preset) = preset {
        ColorPalette::from_hex_strings(&preset.colors)
    } else {
        ColorPalette::new()
    }
}
