use crate::runtime::RenderPolicy;

/// Hard capacity of the shader's color uniform array.
pub const MAX_COLORS: usize = 8;

/// Ordered color palette prepared for the renderer.
///
/// The shader declares a fixed-size array of eight colors together with an
/// active-count uniform; slots past `len` stay zeroed and are never sampled
/// because the shader loop exits once the count is reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPalette {
    colors: [[f32; 3]; MAX_COLORS],
    len: usize,
}

impl ColorPalette {
    /// Creates an empty palette; the field renders black until colors are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a palette from hex-like color strings, truncating to the first
    /// eight entries.
    ///
    /// Parsing is best-effort: both `#rgb` and `#rrggbb` forms are accepted
    /// (with or without the leading `#`), and malformed channels decode to
    /// zero instead of failing. Garbage in produces a garbage color, not an
    /// error, because the palette is purely cosmetic.
    pub fn from_hex_strings<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut palette = Self::default();
        for entry in entries.iter().take(MAX_COLORS) {
            palette.push(parse_hex_color(entry.as_ref()));
        }
        palette
    }

    /// Appends a normalized RGB triple; silently ignored once full.
    pub fn push(&mut self, color: [f32; 3]) {
        if self.len < MAX_COLORS {
            self.colors[self.len] = color;
            self.len += 1;
        }
    }

    /// Number of active colors (gates the shader loop).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The full slot array, including zeroed tail entries.
    pub fn slots(&self) -> &[[f32; 3]; MAX_COLORS] {
        &self.colors
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: [[0.0; 3]; MAX_COLORS],
            len: 0,
        }
    }
}

/// Decodes `#rgb` / `#rrggbb` into normalized RGB; bad channels become 0.
fn parse_hex_color(raw: &str) -> [f32; 3] {
    let hex = raw.trim().trim_start_matches('#');
    let byte = |slice: &str| u8::from_str_radix(slice, 16).unwrap_or(0) as f32 / 255.0;
    if hex.len() == 3 && hex.is_char_boundary(1) && hex.is_char_boundary(2) {
        let nibble = |slice: &str| {
            let value = u8::from_str_radix(slice, 16).unwrap_or(0);
            (value * 16 + value) as f32 / 255.0
        };
        [
            nibble(&hex[0..1]),
            nibble(&hex[1..2]),
            nibble(&hex[2..3]),
        ]
    } else if hex.len() >= 6 && hex.is_char_boundary(2) && hex.is_char_boundary(4) && hex.is_char_boundary(6) {
        [byte(&hex[0..2]), byte(&hex[2..4]), byte(&hex[4..6])]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Parameters of the color-field animation.
///
/// Values are not range-checked here; the shader clamps
/// `scale` and `warp_strength` where degenerate inputs would otherwise
/// divide by zero or invert the warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldOptions {
    /// Time multiplier applied before the field is evaluated.
    pub speed: f32,
    /// Base rotation of the coordinate frame in degrees.
    pub rotation_degrees: f32,
    /// Additional rotation in degrees per second of elapsed time.
    pub auto_rotate: f32,
    /// Spatial zoom; larger values spread the field out.
    pub scale: f32,
    /// Frequency of the sinusoidal warp bands.
    pub frequency: f32,
    /// Warp intensity; [0,1] interpolates toward the fully warped field,
    /// anything above 1 adds extra displacement gain.
    pub warp_strength: f32,
    /// How strongly the field is pulled toward the pointer.
    pub mouse_influence: f32,
    /// Pointer-driven parallax offset of the whole field.
    pub parallax: f32,
    /// Per-pixel dither amplitude; 0 disables the noise pass.
    pub noise: f32,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            speed: 0.2,
            rotation_degrees: 45.0,
            auto_rotate: 0.0,
            scale: 1.0,
            frequency: 1.0,
            warp_strength: 1.0,
            mouse_influence: 1.0,
            parallax: 0.5,
            noise: 0.1,
        }
    }
}

impl FieldOptions {
    /// Rotation angle in degrees after `elapsed` seconds of animation.
    ///
    /// The base rotation is folded into [0,360) once at the start; the
    /// auto-rotate contribution grows without wrapping.
    pub fn rotation_at(&self, elapsed_seconds: f32) -> f32 {
        self.rotation_degrees % 360.0 + self.auto_rotate * elapsed_seconds
    }
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Off
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// A renderer instance never reconfigures in place: changing any of these
/// values means tearing the instance down and building a new one.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Window or surface size in physical pixels.
    pub surface_size: (u32, u32),
    /// Title of the preview window.
    pub title: String,
    /// Colors blended into the field.
    pub palette: ColorPalette,
    /// Animation parameters.
    pub options: FieldOptions,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// High-level render behaviour (animate vs fixed timestamp).
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides a 1080p windowed configuration with an empty palette.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            title: "ColorBends".to_string(),
            palette: ColorPalette::default(),
            options: FieldOptions::default(),
            antialiasing: Antialiasing::default(),
            policy: RenderPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let palette = ColorPalette::from_hex_strings(&["#ff0080"]);
        assert_eq!(palette.len(), 1);
        let [r, g, b] = palette.slots()[0];
        assert!((r - 1.0).abs() < 1e-6);
        assert!(g.abs() < 1e-6);
        assert!((b - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_three_digit_hex() {
        let palette = ColorPalette::from_hex_strings(&["fa0"]);
        let [r, g, b] = palette.slots()[0];
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 170.0 / 255.0).abs() < 1e-6);
        assert!(b.abs() < 1e-6);
    }

    #[test]
    fn malformed_hex_degrades_to_black_channels() {
        let palette = ColorPalette::from_hex_strings(&["#zzka9q", "nonsense"]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.slots()[0], [0.0, 0.0, 0.0]);
        assert_eq!(palette.slots()[1], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn multibyte_input_degrades_to_black_channels() {
        // "€" is one char but three bytes, "日本語" is nine bytes.
        let palette = ColorPalette::from_hex_strings(&["\u{20ac}", "日本語", "#ßß"]);
        assert_eq!(palette.len(), 3);
        for slot in &palette.slots()[..3] {
            assert_eq!(*slot, [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn truncates_to_capacity() {
        let entries: Vec<String> = (0..12).map(|i| format!("#0000{i:02x}")).collect();
        let palette = ColorPalette::from_hex_strings(&entries);
        assert_eq!(palette.len(), MAX_COLORS);
    }

    #[test]
    fn unused_slots_stay_zeroed() {
        let palette = ColorPalette::from_hex_strings(&["#ffffff", "#ffffff", "#ffffff"]);
        assert_eq!(palette.len(), 3);
        for slot in &palette.slots()[3..] {
            assert_eq!(*slot, [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn rotation_at_zero_is_base_mod_360() {
        let options = FieldOptions {
            rotation_degrees: 405.0,
            auto_rotate: 10.0,
            ..FieldOptions::default()
        };
        assert!((options.rotation_at(0.0) - 45.0).abs() < 1e-4);
        assert!((options.rotation_at(2.0) - 65.0).abs() < 1e-4);
    }
}
