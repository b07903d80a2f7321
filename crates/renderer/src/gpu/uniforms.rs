use bytemuck::{Pod, Zeroable};

use crate::types::{ColorPalette, FieldOptions, MAX_COLORS};

/// CPU-side mirror of the `FieldParams` uniform block in `compile.rs`.
///
/// std140 layout: vec2 members sit on 8-byte offsets, the color array uses
/// a 16-byte stride (vec3 colors padded out to vec4), and the struct size
/// is a multiple of 16. `layout_is_std140_compatible` pins all of this down
/// in tests.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct FieldUniforms {
    canvas: [f32; 2],
    time: f32,
    speed: f32,
    rot: [f32; 2],
    color_count: i32,
    scale: f32,
    frequency: f32,
    warp_strength: f32,
    pointer: [f32; 2],
    mouse_influence: f32,
    parallax: f32,
    noise: f32,
    _padding: f32,
    colors: [[f32; 4]; MAX_COLORS],
}

unsafe impl Zeroable for FieldUniforms {}
unsafe impl Pod for FieldUniforms {}

impl FieldUniforms {
    pub fn new(width: u32, height: u32, palette: &ColorPalette, options: &FieldOptions) -> Self {
        let mut uniforms = Self {
            canvas: [width.max(1) as f32, height.max(1) as f32],
            time: 0.0,
            speed: options.speed,
            rot: [1.0, 0.0],
            color_count: 0,
            scale: options.scale,
            frequency: options.frequency,
            warp_strength: options.warp_strength,
            pointer: [0.0, 0.0],
            mouse_influence: options.mouse_influence,
            parallax: options.parallax,
            noise: options.noise,
            _padding: 0.0,
            colors: [[0.0; 4]; MAX_COLORS],
        };
        uniforms.set_palette(palette);
        uniforms.set_rotation_degrees(options.rotation_at(0.0));
        uniforms
    }

    /// Copies the active palette entries and the gating count; tail slots
    /// stay zeroed.
    pub fn set_palette(&mut self, palette: &ColorPalette) {
        self.colors = [[0.0; 4]; MAX_COLORS];
        for (slot, color) in self
            .colors
            .iter_mut()
            .zip(palette.slots().iter().take(palette.len()))
        {
            *slot = [color[0], color[1], color[2], 1.0];
        }
        self.color_count = palette.len() as i32;
    }

    pub fn set_canvas(&mut self, width: f32, height: f32) {
        self.canvas = [width.max(1.0), height.max(1.0)];
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    /// Stores the rotation as a unit direction vector so the shader can use
    /// it directly as a 2x2 rotation matrix.
    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        let radians = degrees.to_radians();
        self.rot = [radians.cos(), radians.sin()];
    }

    pub fn set_pointer(&mut self, pointer: [f32; 2]) {
        self.pointer = pointer;
    }

    #[cfg(test)]
    pub fn canvas(&self) -> [f32; 2] {
        self.canvas
    }

    #[cfg(test)]
    pub fn rotation(&self) -> [f32; 2] {
        self.rot
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    fn options() -> FieldOptions {
        FieldOptions::default()
    }

    #[test]
    fn layout_is_std140_compatible() {
        assert_eq!(size_of::<FieldUniforms>(), 192);
        assert_eq!(offset_of!(FieldUniforms, canvas), 0);
        assert_eq!(offset_of!(FieldUniforms, rot), 16);
        assert_eq!(offset_of!(FieldUniforms, pointer), 40);
        assert_eq!(offset_of!(FieldUniforms, colors), 64);
    }

    #[test]
    fn truncated_palette_matches_short_palette() {
        let long: Vec<&str> = vec![
            "#111111", "#222222", "#333333", "#444444", "#555555", "#666666", "#777777", "#888888",
        ];
        let mut truncated = ColorPalette::new();
        for color in ColorPalette::from_hex_strings(&long).slots().iter().take(3) {
            truncated.push(*color);
        }
        let short = ColorPalette::from_hex_strings(&long[..3]);

        let a = FieldUniforms::new(640, 480, &truncated, &options());
        let b = FieldUniforms::new(640, 480, &short, &options());
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
        assert_eq!(a.color_count, 3);
    }

    #[test]
    fn palette_slots_past_count_are_zero() {
        let palette = ColorPalette::from_hex_strings(&["#ffffff", "#808080"]);
        let uniforms = FieldUniforms::new(1, 1, &palette, &options());
        assert_eq!(uniforms.color_count, 2);
        for slot in &uniforms.colors[2..] {
            assert_eq!(*slot, [0.0; 4]);
        }
    }

    #[test]
    fn rotation_vector_is_unit_length() {
        let palette = ColorPalette::new();
        let mut uniforms = FieldUniforms::new(1, 1, &palette, &options());
        for degrees in [0.0_f32, 45.0, 90.0, 361.0, -30.0] {
            uniforms.set_rotation_degrees(degrees);
            let [c, s] = uniforms.rotation();
            assert!((c * c + s * s - 1.0).abs() < 1e-5);
        }
        uniforms.set_rotation_degrees(90.0);
        let [c, s] = uniforms.rotation();
        assert!(c.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn canvas_follows_the_latest_resize_only() {
        let palette = ColorPalette::new();
        let mut uniforms = FieldUniforms::new(800, 600, &palette, &options());
        uniforms.set_canvas(1024.0, 768.0);
        uniforms.set_canvas(640.0, 480.0);
        assert_eq!(uniforms.canvas(), [640.0, 480.0]);
    }

    #[test]
    fn zero_sized_canvas_is_clamped() {
        let palette = ColorPalette::new();
        let mut uniforms = FieldUniforms::new(0, 0, &palette, &options());
        assert_eq!(uniforms.canvas(), [1.0, 1.0]);
        uniforms.set_canvas(0.0, 0.0);
        assert_eq!(uniforms.canvas(), [1.0, 1.0]);
    }
}
