use std::path::PathBuf;

use clap::Parser;
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "colorbends",
    author,
    version,
    about = "Animated color-field background renderer",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Hex color added to the palette (e.g. `#ff5f6d`); repeatable, the
    /// first eight entries are used. Overrides the preset palette entirely.
    #[arg(long = "color", value_name = "HEX")]
    pub colors: Vec<String>,

    /// Named preset to start from; defaults to the presets file's default.
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// TOML presets file to use instead of the built-in set.
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Animation speed multiplier.
    #[arg(long, value_name = "FACTOR")]
    pub speed: Option<f32>,

    /// Base rotation of the field in degrees.
    #[arg(long, value_name = "DEGREES")]
    pub rotation: Option<f32>,

    /// Continuous rotation in degrees per second.
    #[arg(long = "auto-rotate", value_name = "DEG_PER_SEC")]
    pub auto_rotate: Option<f32>,

    /// Spatial zoom of the field.
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f32>,

    /// Frequency of the sinusoidal warp bands.
    #[arg(long, value_name = "FACTOR")]
    pub frequency: Option<f32>,

    /// Warp intensity; values above 1 add extra displacement gain.
    #[arg(long = "warp-strength", value_name = "FACTOR")]
    pub warp_strength: Option<f32>,

    /// How strongly the field is pulled toward the pointer.
    #[arg(long = "mouse-influence", value_name = "FACTOR")]
    pub mouse_influence: Option<f32>,

    /// Pointer-driven parallax offset strength.
    #[arg(long, value_name = "FACTOR")]
    pub parallax: Option<f32>,

    /// Per-pixel dither amplitude (0 disables the noise pass).
    #[arg(long, value_name = "AMOUNT")]
    pub noise: Option<f32>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Freeze the field at a fixed timestamp instead of animating.
    #[arg(long)]
    pub still: bool,

    /// Timestamp in seconds to freeze at (implies `--still` semantics only
    /// together with that flag).
    #[arg(long = "still-time", value_name = "SECONDS")]
    pub still_time: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "off"
    )]
    pub antialias: Antialiasing,

    /// Window title.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32), String> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 0 || samples == 1 {
                Ok(Antialiasing::Off)
            } else if samples.is_power_of_two() && samples <= 16 {
                Ok(Antialiasing::Samples(samples))
            } else {
                Err(format!(
                    "unsupported anti-alias sample count {samples}; use 2, 4, 8, or 16"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_size() {
        assert_eq!(parse_surface_size("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_surface_size(" 640 X 480 "), Ok((640, 480)));
        assert!(parse_surface_size("1920").is_err());
        assert!(parse_surface_size("0x100").is_err());
        assert!(parse_surface_size("axb").is_err());
    }

    #[test]
    fn parses_antialias_modes() {
        assert_eq!(parse_antialias("auto"), Ok(Antialiasing::Auto));
        assert_eq!(parse_antialias("off"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("1"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("4"), Ok(Antialiasing::Samples(4)));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("32").is_err());
        assert!(parse_antialias("").is_err());
    }

    #[test]
    fn parses_repeatable_colors() {
        let cli = Cli::parse_from([
            "colorbends",
            "--color",
            "#1a1a1a",
            "--color",
            "#2d2d2d",
            "--auto-rotate",
            "10",
        ]);
        assert_eq!(cli.colors.len(), 2);
        assert_eq!(cli.auto_rotate, Some(10.0));
        assert_eq!(cli.antialias, Antialiasing::Off);
    }
}
