use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the embedded color-field fragment shader through naga's GLSL
/// frontend.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("color field fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// The layered color-field kernel.
///
/// The uniform block layout must match [`FieldUniforms`] in
/// `gpu/uniforms.rs` field for field. Colors are packed as vec4 because of
/// std140 array strides; only `.rgb` is sampled.
///
/// The field itself: centered, aspect-corrected coordinates are rotated and
/// lens-compressed (`q /= 0.5 + 0.2 * dot(q, q)` grows with distance from
/// center), then each active color layer samples a domain-warped sinusoid.
/// `warp_strength` below 1 interpolates between the unwarped and warped
/// samples; the excess above 1 becomes extra displacement gain. The scalar
/// field turns into a glow-like weight via `1 - exp(-6 / exp(6 * m))`.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform FieldParams {
    vec2 canvas;
    float time;
    float speed;
    vec2 rot;
    int color_count;
    float scale;
    float frequency;
    float warp_strength;
    vec2 pointer;
    float mouse_influence;
    float parallax;
    float noise_amount;
    float pad0;
    vec4 colors[8];
} params;

void main() {
    float t = params.time * params.speed;
    vec2 p = v_uv * 2.0 - 1.0;
    p += params.pointer * params.parallax * 0.1;
    vec2 rp = vec2(p.x * params.rot.x - p.y * params.rot.y,
                   p.x * params.rot.y + p.y * params.rot.x);
    vec2 q = vec2(rp.x * (params.canvas.x / params.canvas.y), rp.y);
    q /= max(params.scale, 0.0001);
    q /= 0.5 + 0.2 * dot(q, q);
    q += 0.2 * cos(t) - 7.56;
    vec2 toward = params.pointer - rp;
    q += toward * params.mouse_influence * 0.2;

    vec3 col = vec3(0.0);

    if (params.color_count > 0) {
        vec2 s = q;
        vec3 sum_col = vec3(0.0);
        for (int i = 0; i < 8; ++i) {
            if (i >= params.color_count) {
                break;
            }
            s -= 0.01;
            vec2 r = sin(1.5 * (s.yx * params.frequency) + 2.0 * cos(s * params.frequency));
            float m0 = length(r + sin(5.0 * r.y * params.frequency - 3.0 * t + float(i)) / 4.0);
            float k_below = clamp(params.warp_strength, 0.0, 1.0);
            float k_mix = pow(k_below, 0.3);
            float gain = 1.0 + max(params.warp_strength - 1.0, 0.0);
            vec2 disp = (r - s) * k_below;
            vec2 warped = s + disp * gain;
            float m1 = length(warped + sin(5.0 * warped.y * params.frequency - 3.0 * t + float(i)) / 4.0);
            float m = mix(m0, m1, k_mix);
            float w = 1.0 - exp(-6.0 / exp(6.0 * m));
            sum_col += params.colors[i].rgb * w;
        }
        col = clamp(sum_col, 0.0, 1.0);
    }

    if (params.noise_amount > 0.0001) {
        float n = fract(sin(dot(gl_FragCoord.xy + vec2(params.time),
                                vec2(12.9898, 78.233))) * 43758.5453123);
        col += (n - 0.5) * params.noise_amount;
        col = clamp(col, 0.0, 1.0);
    }

    out_color = vec4(col, 1.0);
}
";
