//! Renderer crate for ColorBends.
//!
//! The crate owns the full path from a [`RendererConfig`] to animated
//! pixels: a `winit` window, a `wgpu` pipeline around the embedded
//! color-field shader, and the per-frame state (time, smoothed pointer,
//! rotation) feeding its uniforms. The overall flow is:
//!
//! ```text
//!   CLI / presets
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ GpuState::render()
//!          ▲                                      │
//!          │                                      └─▶ FieldUniforms ─▶ GPU UBO
//! ```
//!
//! `GpuState` owns all GPU resources (surface, device, pipeline, uniforms)
//! plus the pointer tracker, while `Renderer` is the thin entry point.
//! Configuration is immutable for the life of an instance; changing it
//! means tearing down and building a new renderer.

mod compile;
mod gpu;
mod pointer;
mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameScheduler, RenderPolicy,
    SystemTimeSource, TimeSample, TimeSource,
};
pub use types::{Antialiasing, ColorPalette, FieldOptions, RendererConfig, MAX_COLORS};

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window module; `Renderer` simply
/// forwards the request and applies the degrade-on-no-GPU contract.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and renders until it is closed.
    ///
    /// A missing GPU adapter or surface is not an error: the renderer is a
    /// decorative background and must never take the host process down, so
    /// that case logs a warning and returns Ok with nothing rendered.
    pub fn run(&mut self) -> Result<()> {
        window::run_windowed(&self.config)
    }
}
